//! The inventory: collected objects, their slot layout and the selection.
//!
//! Held objects are drawn in their own screen region by a dedicated camera.
//! Every change in membership recomputes the placement of *all* held items,
//! since slot size depends on how many items there are.

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::camera::Camera;
use crate::compositor::Region;
use crate::config::{GameConfig, OverflowPolicy};
use crate::error::{Error, Result};
use crate::object::ObjectId;
use crate::picking::Picker;
use crate::scene_index::{SceneIndex, Transform};

/// Length in world units of the strip the slots are spread along.
pub const LAYOUT_EXTENT: f32 = 3.0;
/// Share of a slot the object's longest dimension fills.
const SLOT_FILL: f32 = 0.8;
/// Margin around the strip as seen by the inventory camera.
const VIEW_MARGIN: f32 = 1.1;

/// Fixed presentation angle of every held object.
fn slot_rotation() -> Quat {
    Quat::from_euler(EulerRot::YXZ, -0.5, 0.35, 0.0)
}

/// Centers and sizes of `count` equal slots stacked top to bottom.
pub fn slot_layout(count: usize, extent: f32) -> Vec<(Vec3, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let size = extent / count as f32;
    (0..count)
        .map(|i| {
            let y = extent * 0.5 - size * (i as f32 + 0.5);
            (Vec3::new(0.0, y, 0.0), size)
        })
        .collect()
}

pub struct Inventory {
    items: Vec<ObjectId>,
    selected: Option<usize>,
    capacity: usize,
    overflow: OverflowPolicy,
    camera: Camera,
    aspect: f32,
}

impl Inventory {
    pub fn new(config: &GameConfig) -> Self {
        let camera = Camera::new().with_fov(40.0);
        let distance = LAYOUT_EXTENT * VIEW_MARGIN / (2.0 * (camera.fov * 0.5).tan());
        let inventory_height = config.height.max(1) as f32;
        Self {
            items: Vec::new(),
            selected: None,
            capacity: config.inventory_capacity,
            overflow: config.overflow,
            camera: camera.at(Vec3::new(0.0, 0.0, distance)).looking_at(Vec3::ZERO),
            aspect: config.inventory_width / inventory_height,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_held(&self, id: ObjectId) -> bool {
        self.items.contains(&id)
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected() == Some(id)
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected.map(|index| self.items[index])
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The object the inventory region outlines: the selected one.
    pub fn highlighted(&self) -> Option<ObjectId> {
        self.selected()
    }

    /// Take an object out of the world and into a slot.
    ///
    /// Collecting an object that is already held does nothing. Dropped
    /// objects are refused, and so is a full inventory under
    /// [`OverflowPolicy::Reject`].
    pub fn collect(&mut self, scene: &mut SceneIndex, id: ObjectId) -> Result<()> {
        let object = scene.object(id);
        if object.is_dropped() {
            tracing::warn!("'{}' was dropped, refusing to collect it", object.name());
            return Err(Error::Dropped(object.name().to_string()));
        }
        if self.is_held(id) {
            tracing::debug!("'{}' is already in the inventory", object.name());
            scene.object_mut(id).set_visible(false);
            return Ok(());
        }
        if self.overflow == OverflowPolicy::Reject && self.items.len() >= self.capacity {
            tracing::warn!(
                "inventory full ({} slots), '{}' stays in the world",
                self.capacity,
                object.name()
            );
            return Err(Error::InventoryFull {
                capacity: self.capacity,
            });
        }

        tracing::debug!("collecting '{}'", object.name());
        self.items.push(id);
        scene.object_mut(id).set_visible(false);
        self.relayout(scene);
        Ok(())
    }

    /// Remove a held object for good: it is marked dropped and hidden.
    pub fn drop(&mut self, scene: &mut SceneIndex, id: ObjectId) -> Result<()> {
        let Some(index) = self.items.iter().position(|&held| held == id) else {
            let name = scene.object(id).name().to_string();
            tracing::error!("cannot drop '{}': it is not in the inventory", name);
            return Err(Error::NotHeld(name));
        };

        tracing::debug!("dropping '{}'", scene.object(id).name());
        self.items.remove(index);
        self.selected = None;
        scene.object_mut(id).mark_dropped();
        scene.set_slot_transform(id, None);
        self.relayout(scene);
        Ok(())
    }

    /// Select the item at `index`, or deselect it if it already is.
    pub fn toggle_selection(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            tracing::error!(
                "selection index {} out of range ({} held items)",
                index,
                self.items.len()
            );
            return Err(Error::SelectionOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.selected = if self.selected == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Handle a click in the inventory region.
    ///
    /// `ndc` is the pointer position normalized to the inventory region.
    /// Toggles the selection of the held object under the pointer, if any.
    pub fn pointer_hit(
        &mut self,
        scene: &SceneIndex,
        picker: &dyn Picker,
        ndc: Vec2,
    ) -> Option<ObjectId> {
        let hit = picker.pick(scene, Region::Inventory, &self.camera, ndc, self.aspect)?;
        let index = self.items.iter().position(|&held| held == hit)?;
        // Index comes from the current list, so the toggle cannot fail.
        let _ = self.toggle_selection(index);
        Some(hit)
    }

    /// Follow a change of the inventory region's shape.
    pub fn resize(&mut self, scene: &mut SceneIndex, aspect: f32) {
        if aspect > 0.0 && (aspect - self.aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.relayout(scene);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Place every held item in its slot.
    fn relayout(&mut self, scene: &mut SceneIndex) {
        let distance = self.camera.pose.position.distance(self.camera.pose.look_at);
        let visible_width = self.camera.visible_height_at(distance) * self.aspect;
        let rotation = slot_rotation();

        for (&id, (center, slot_size)) in self
            .items
            .iter()
            .zip(slot_layout(self.items.len(), LAYOUT_EXTENT))
        {
            let fit = slot_size.min(visible_width) * SLOT_FILL;
            let longest = scene.bounds(id).map_or(1.0, |b| b.longest());
            let scale = if longest > f32::EPSILON {
                fit / longest
            } else {
                1.0
            };
            let transform = Transform::new()
                .position(center)
                .rotation(rotation)
                .uniform_scale(scale);
            scene.set_slot_transform(id, Some(transform));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_index::SceneEntity;

    fn scene() -> SceneIndex {
        SceneIndex::from_entities(vec![
            SceneEntity::object("key", Vec3::ZERO, Vec3::new(0.2, 0.05, 0.02)),
            SceneEntity::object("note", Vec3::X, Vec3::new(0.3, 0.4, 0.01)),
            SceneEntity::object("coin", Vec3::Y, Vec3::new(0.1, 0.1, 0.01)),
            SceneEntity::object("lens", Vec3::Z, Vec3::new(0.1, 0.1, 0.1)),
        ])
        .unwrap()
    }

    fn ids(scene: &SceneIndex) -> [ObjectId; 4] {
        ["key", "note", "coin", "lens"].map(|name| scene.resolve(name).unwrap())
    }

    #[test]
    fn slot_layout_is_evenly_spaced() {
        let slots = slot_layout(3, 3.0);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0], (Vec3::new(0.0, 1.0, 0.0), 1.0));
        assert_eq!(slots[1], (Vec3::ZERO, 1.0));
        assert_eq!(slots[2], (Vec3::new(0.0, -1.0, 0.0), 1.0));
        assert!(slot_layout(0, 3.0).is_empty());
    }

    #[test]
    fn collect_hides_and_places() {
        let mut scene = scene();
        let [key, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());

        inventory.collect(&mut scene, key).unwrap();
        assert!(inventory.is_held(key));
        assert!(!scene.object(key).is_visible());
        assert!(scene.slot_transform(key).is_some());
    }

    #[test]
    fn second_item_moves_the_first() {
        let mut scene = scene();
        let [key, note, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());

        inventory.collect(&mut scene, key).unwrap();
        let before = scene.slot_transform(key).unwrap();
        inventory.collect(&mut scene, note).unwrap();
        let after = scene.slot_transform(key).unwrap();

        assert_ne!(before.position, after.position);
        assert!(after.position.y > scene.slot_transform(note).unwrap().position.y);
    }

    #[test]
    fn scale_fits_longest_dimension() {
        let mut scene = scene();
        let [key, note, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.collect(&mut scene, note).unwrap();

        let key_fit = scene.slot_transform(key).unwrap().scale.x * 0.2;
        let note_fit = scene.slot_transform(note).unwrap().scale.x * 0.4;
        assert!((key_fit - note_fit).abs() < 1e-4);
    }

    #[test]
    fn full_inventory_rejects_by_default() {
        let mut scene = scene();
        let [key, note, coin, lens] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        for id in [key, note, coin] {
            inventory.collect(&mut scene, id).unwrap();
        }

        let result = inventory.collect(&mut scene, lens);
        assert!(matches!(result, Err(Error::InventoryFull { capacity: 3 })));
        assert!(!inventory.is_held(lens));
        assert!(scene.object(lens).is_visible());
    }

    #[test]
    fn crowd_policy_accepts_past_capacity() {
        let mut scene = scene();
        let all = ids(&scene);
        let config = GameConfig::new().overflow(OverflowPolicy::Crowd);
        let mut inventory = Inventory::new(&config);
        for id in all {
            inventory.collect(&mut scene, id).unwrap();
        }
        assert_eq!(inventory.len(), 4);
    }

    #[test]
    fn collect_twice_is_a_no_op() {
        let mut scene = scene();
        let [key, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.collect(&mut scene, key).unwrap();
        assert_eq!(inventory.items(), &[key]);
    }

    #[test]
    fn selection_toggles_back_and_forth() {
        let mut scene = scene();
        let [key, note, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.collect(&mut scene, note).unwrap();

        inventory.toggle_selection(1).unwrap();
        assert!(inventory.is_selected(note));
        inventory.toggle_selection(1).unwrap();
        assert!(!inventory.is_selected(note));
        inventory.toggle_selection(1).unwrap();
        assert!(inventory.is_selected(note));

        inventory.toggle_selection(0).unwrap();
        assert!(inventory.is_selected(key));
        assert!(!inventory.is_selected(note));
    }

    #[test]
    fn clear_selection_keeps_items() {
        let mut scene = scene();
        let [key, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.toggle_selection(0).unwrap();

        inventory.clear_selection();
        assert_eq!(inventory.selected(), None);
        assert!(inventory.is_held(key));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut inventory = Inventory::new(&GameConfig::default());
        let result = inventory.toggle_selection(0);
        assert!(matches!(
            result,
            Err(Error::SelectionOutOfRange { index: 0, len: 0 })
        ));
        assert!(inventory.selected_index().is_none());
    }

    #[test]
    fn drop_is_terminal() {
        let mut scene = scene();
        let [key, note, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.collect(&mut scene, note).unwrap();
        inventory.toggle_selection(0).unwrap();

        inventory.drop(&mut scene, key).unwrap();
        assert!(!inventory.is_held(key));
        assert!(!inventory.is_selected(key));
        assert!(inventory.selected_index().is_none());
        assert!(scene.object(key).is_dropped());
        assert!(!scene.object(key).is_visible());
        assert!(scene.slot_transform(key).is_none());

        let result = inventory.collect(&mut scene, key);
        assert!(matches!(result, Err(Error::Dropped(_))));
        assert!(!inventory.is_held(key));
        assert!(!scene.object(key).is_visible());
    }

    #[test]
    fn dropping_recenters_remaining_items() {
        let mut scene = scene();
        let [key, note, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());
        inventory.collect(&mut scene, key).unwrap();
        inventory.collect(&mut scene, note).unwrap();

        inventory.drop(&mut scene, key).unwrap();
        assert_eq!(scene.slot_transform(note).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn dropping_unheld_object_fails() {
        let mut scene = scene();
        let [key, ..] = ids(&scene);
        let mut inventory = Inventory::new(&GameConfig::default());

        let result = inventory.drop(&mut scene, key);
        assert!(matches!(result, Err(Error::NotHeld(n)) if n == "key"));
        assert!(!scene.object(key).is_dropped());
        assert!(scene.object(key).is_visible());
    }
}
