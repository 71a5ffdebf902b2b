//! The loaded scene: entities, interactive objects and view camera poses.
//!
//! A [`SceneIndex`] is built once from the scene provider's entity list and
//! then passed by reference to everything that needs to resolve names,
//! poses or entity geometry. Entity data lives in a `hecs` world; the index
//! keeps the name lookups next to it.
//!
//! # Naming conventions
//!
//! | Entity name        | Becomes                                  |
//! |--------------------|------------------------------------------|
//! | `desk_camera`      | camera position of view `desk`           |
//! | `desk_lookat`      | look-at point of view `desk`             |
//! | anything else      | a drawable entity; a [`GameObject`] too if interactive |
//!
//! # Example
//!
//! ```
//! use escape_room::{SceneEntity, SceneIndex, Vec3};
//!
//! let scene = SceneIndex::from_entities(vec![
//!     SceneEntity::marker("desk_camera", Vec3::new(0.0, 1.6, 3.0)),
//!     SceneEntity::marker("desk_lookat", Vec3::new(0.0, 0.8, 0.0)),
//!     SceneEntity::object("key", Vec3::new(0.3, 0.8, 0.0), Vec3::new(0.1, 0.02, 0.04)),
//!     SceneEntity::prop("desk", Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.5, 0.8, 0.7)),
//! ])
//! .unwrap();
//!
//! assert!(scene.pose("desk").is_ok());
//! assert!(scene.object_id("key").is_some());
//! assert!(scene.object_id("desk").is_none());
//! ```

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::camera::Pose;
use crate::draw2d::Color;
use crate::error::{Error, Result};
use crate::object::{GameObject, ObjectId};
use crate::picking::Collider;

/// Name suffix marking a view's camera position.
pub const CAMERA_SUFFIX: &str = "_camera";
/// Name suffix marking a view's look-at point.
pub const LOOKAT_SUFFIX: &str = "_lookat";

/// Position, rotation and scale of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Local-space bounding box size of an entity, centered on its origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub size: Vec3,
}

impl Bounds {
    pub fn new(size: Vec3) -> Self {
        Self { size }
    }

    /// The largest of the three box dimensions.
    pub fn longest(&self) -> f32 {
        self.size.max_element()
    }

    /// The eight box corners after applying `transform`.
    pub fn corners(&self, transform: &Transform) -> [Vec3; 8] {
        let h = self.size * 0.5;
        let matrix = transform.matrix();
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let local = Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            );
            *corner = matrix.transform_point3(local);
        }
        corners
    }
}

/// Flat color used when the entity is drawn.
#[derive(Clone, Copy, Debug)]
pub struct Tint(pub Color);

/// Display name of an entity.
#[derive(Clone, Debug)]
pub struct EntityName(pub String);

/// Links an entity back to its [`GameObject`].
#[derive(Clone, Copy, Debug)]
pub struct ObjectLink(pub ObjectId);

/// Where a held object is drawn inside the inventory region.
#[derive(Clone, Copy, Debug)]
pub struct SlotTransform(pub Transform);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityKind {
    Interactive,
    Prop,
    Marker,
}

/// One entity as delivered by the scene provider.
#[derive(Clone, Debug)]
pub struct SceneEntity {
    name: String,
    kind: EntityKind,
    transform: Transform,
    size: Vec3,
    color: Color,
}

impl SceneEntity {
    /// A pickable entity that becomes a [`GameObject`].
    pub fn object(name: impl Into<String>, position: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Interactive,
            transform: Transform::from_position(position),
            size,
            color: Color::rgb(0.75, 0.7, 0.6),
        }
    }

    /// Static scenery: drawn but never picked.
    pub fn prop(name: impl Into<String>, position: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Prop,
            transform: Transform::from_position(position),
            size,
            color: Color::rgb(0.35, 0.3, 0.28),
        }
    }

    /// An invisible point, typically a `*_camera` or `*_lookat` pose marker.
    pub fn marker(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Marker,
            transform: Transform::from_position(position),
            size: Vec3::ZERO,
            color: Color::TRANSPARENT,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Something a render backend should draw in one region.
#[derive(Clone, Copy, Debug)]
pub struct Drawable {
    pub entity: hecs::Entity,
    pub object: Option<ObjectId>,
    pub transform: Transform,
    pub bounds: Bounds,
    pub color: Color,
}

/// The loaded scene.
pub struct SceneIndex {
    world: hecs::World,
    objects: Vec<GameObject>,
    object_names: HashMap<String, ObjectId>,
    cameras: HashMap<String, Vec3>,
    look_ats: HashMap<String, Vec3>,
}

impl SceneIndex {
    /// Build the index from the scene provider's entities.
    ///
    /// Camera and look-at markers are recorded per view name; the pairing is
    /// only checked when a view is entered (see [`pose`](Self::pose)).
    pub fn from_entities(entities: Vec<SceneEntity>) -> Result<Self> {
        let mut index = Self {
            world: hecs::World::new(),
            objects: Vec::new(),
            object_names: HashMap::new(),
            cameras: HashMap::new(),
            look_ats: HashMap::new(),
        };
        let mut seen = std::collections::HashSet::new();

        for entity in entities {
            if !seen.insert(entity.name.clone()) {
                return Err(Error::DuplicateEntity(entity.name));
            }

            if let Some(view) = entity.name.strip_suffix(CAMERA_SUFFIX) {
                index
                    .cameras
                    .insert(view.to_string(), entity.transform.position);
                continue;
            }
            if let Some(view) = entity.name.strip_suffix(LOOKAT_SUFFIX) {
                index
                    .look_ats
                    .insert(view.to_string(), entity.transform.position);
                continue;
            }

            match entity.kind {
                EntityKind::Marker => {}
                EntityKind::Prop => {
                    index.world.spawn((
                        EntityName(entity.name),
                        entity.transform,
                        Bounds::new(entity.size),
                        Tint(entity.color),
                    ));
                }
                EntityKind::Interactive => {
                    let id = ObjectId(index.objects.len());
                    let handle = index.world.spawn((
                        EntityName(entity.name.clone()),
                        entity.transform,
                        Bounds::new(entity.size),
                        Tint(entity.color),
                        Collider::box_collider(entity.size),
                        ObjectLink(id),
                    ));
                    index.object_names.insert(entity.name.clone(), id);
                    index
                        .objects
                        .push(GameObject::new(id, handle, entity.name));
                }
            }
        }

        tracing::debug!(
            "scene loaded: {} objects, {} camera markers, {} look-at markers",
            index.objects.len(),
            index.cameras.len(),
            index.look_ats.len()
        );

        Ok(index)
    }

    /// Camera pose of a view, from its `_camera` and `_lookat` markers.
    pub fn pose(&self, view: &str) -> Result<Pose> {
        match (self.cameras.get(view), self.look_ats.get(view)) {
            (Some(position), Some(look_at)) => Ok(Pose::new(*position, *look_at)),
            _ => Err(Error::MissingPose(view.to_string())),
        }
    }

    /// Views for which at least one pose marker exists, sorted by name.
    pub fn pose_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .cameras
            .keys()
            .chain(self.look_ats.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn object_id(&self, name: &str) -> Option<ObjectId> {
        self.object_names.get(name).copied()
    }

    /// Like [`object_id`](Self::object_id) but reports unknown names as errors.
    pub fn resolve(&self, name: &str) -> Result<ObjectId> {
        self.object_id(name)
            .ok_or_else(|| Error::UnknownObject(name.to_string()))
    }

    pub fn object(&self, id: ObjectId) -> &GameObject {
        &self.objects[id.0]
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> &mut GameObject {
        &mut self.objects[id.0]
    }

    pub fn objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn transform(&self, id: ObjectId) -> Option<Transform> {
        self.world
            .get::<&Transform>(self.object(id).entity())
            .ok()
            .map(|t| *t)
    }

    pub fn bounds(&self, id: ObjectId) -> Option<Bounds> {
        self.world
            .get::<&Bounds>(self.object(id).entity())
            .ok()
            .map(|b| *b)
    }

    /// Inventory placement of a held object.
    pub fn slot_transform(&self, id: ObjectId) -> Option<Transform> {
        self.world
            .get::<&SlotTransform>(self.object(id).entity())
            .ok()
            .map(|slot| slot.0)
    }

    pub(crate) fn set_slot_transform(&mut self, id: ObjectId, transform: Option<Transform>) {
        let entity = self.object(id).entity();
        match transform {
            Some(transform) => {
                if let Err(e) = self.world.insert_one(entity, SlotTransform(transform)) {
                    tracing::error!("failed to place '{}' in a slot: {}", self.object(id).name(), e);
                }
            }
            None => {
                // A missing component means the object was never slotted.
                let _ = self.world.remove_one::<SlotTransform>(entity);
            }
        }
    }

    /// Entities to draw in the primary region: props and visible objects.
    pub fn world_drawables(&self) -> Vec<Drawable> {
        self.world
            .query::<(&Transform, &Bounds, &Tint, Option<&ObjectLink>)>()
            .iter()
            .filter(|(_, (_, _, _, link))| {
                link.is_none_or(|link| self.objects[link.0.0].is_visible())
            })
            .map(|(entity, (transform, bounds, tint, link))| Drawable {
                entity,
                object: link.map(|l| l.0),
                transform: *transform,
                bounds: *bounds,
                color: tint.0,
            })
            .collect()
    }

    /// Held objects placed in their inventory slots.
    pub fn inventory_drawables(&self) -> Vec<Drawable> {
        self.world
            .query::<(&SlotTransform, &Bounds, &Tint, &ObjectLink)>()
            .iter()
            .map(|(entity, (slot, bounds, tint, link))| Drawable {
                entity,
                object: Some(link.0),
                transform: slot.0,
                bounds: *bounds,
                color: tint.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> SceneIndex {
        SceneIndex::from_entities(vec![
            SceneEntity::marker("hall_camera", Vec3::new(0.0, 1.0, 4.0)),
            SceneEntity::marker("hall_lookat", Vec3::ZERO),
            SceneEntity::marker("attic_camera", Vec3::Y),
            SceneEntity::object("vase", Vec3::ZERO, Vec3::ONE),
            SceneEntity::prop("wall", Vec3::new(0.0, 0.0, -2.0), Vec3::new(4.0, 3.0, 0.1)),
        ])
        .unwrap()
    }

    #[test]
    fn markers_become_poses() {
        let scene = scene();
        assert_eq!(
            scene.pose("hall").unwrap(),
            Pose::new(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO)
        );
        assert_eq!(scene.pose_names(), vec!["attic", "hall"]);
    }

    #[test]
    fn half_registered_pose_is_missing() {
        let scene = scene();
        assert!(matches!(scene.pose("attic"), Err(Error::MissingPose(v)) if v == "attic"));
        assert!(matches!(scene.pose("cellar"), Err(Error::MissingPose(_))));
    }

    #[test]
    fn only_interactive_entities_become_objects() {
        let scene = scene();
        assert_eq!(scene.objects().count(), 1);
        assert!(scene.object_id("wall").is_none());
        assert!(matches!(scene.resolve("wall"), Err(Error::UnknownObject(_))));

        let vase = scene.resolve("vase").unwrap();
        assert_eq!(scene.object(vase).name(), "vase");
        assert_eq!(scene.transform(vase).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = SceneIndex::from_entities(vec![
            SceneEntity::object("cup", Vec3::ZERO, Vec3::ONE),
            SceneEntity::prop("cup", Vec3::X, Vec3::ONE),
        ]);
        assert!(matches!(result, Err(Error::DuplicateEntity(n)) if n == "cup"));
    }

    #[test]
    fn world_drawables_skip_hidden_objects() {
        let mut scene = scene();
        assert_eq!(scene.world_drawables().len(), 2);

        let vase = scene.resolve("vase").unwrap();
        scene.object_mut(vase).set_visible(false);
        let drawables = scene.world_drawables();
        assert_eq!(drawables.len(), 1);
        assert!(drawables[0].object.is_none());
    }

    #[test]
    fn slot_transform_roundtrip() {
        let mut scene = scene();
        let vase = scene.resolve("vase").unwrap();
        assert!(scene.inventory_drawables().is_empty());

        scene.set_slot_transform(vase, Some(Transform::new().uniform_scale(0.5)));
        assert_eq!(scene.slot_transform(vase).unwrap().scale, Vec3::splat(0.5));
        assert_eq!(scene.inventory_drawables().len(), 1);

        scene.set_slot_transform(vase, None);
        assert!(scene.slot_transform(vase).is_none());
    }

    #[test]
    fn bounds_corners_follow_transform() {
        let bounds = Bounds::new(Vec3::new(2.0, 2.0, 2.0));
        let corners = bounds.corners(&Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        assert!(corners.contains(&Vec3::new(9.0, -1.0, -1.0)));
        assert!(corners.contains(&Vec3::new(11.0, 1.0, 1.0)));
        assert_eq!(bounds.longest(), 2.0);
    }
}
