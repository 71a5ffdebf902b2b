//! Interactive objects and the capabilities author code gets over them.
//!
//! Action messages only ever see a [`ReadOnlyObjectView`]; action callbacks
//! get a [`MutableObjectView`]. Both are implemented by short-lived borrows
//! of the [`Stage`] ([`ObjectRef`] and [`ObjectMut`]), so the type system
//! decides what author code may touch.

use crate::error::Result;
use crate::inventory::Inventory;
use crate::scene_index::SceneIndex;

/// Stable identifier of an interactive object within one [`SceneIndex`].
///
/// Ids are handed out at load time in scene order and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Wrapper around one interactive scene entity.
///
/// A dropped object is always invisible and never held; dropping is terminal.
#[derive(Clone, Debug)]
pub struct GameObject {
    id: ObjectId,
    entity: hecs::Entity,
    name: String,
    visible: bool,
    dropped: bool,
}

impl GameObject {
    pub(crate) fn new(id: ObjectId, entity: hecs::Entity, name: String) -> Self {
        Self {
            id,
            entity,
            name,
            visible: true,
            dropped: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn entity(&self) -> hecs::Entity {
        self.entity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    /// Returns false if the object is dropped and therefore stays hidden.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if visible && self.dropped {
            return false;
        }
        self.visible = visible;
        true
    }

    pub(crate) fn mark_dropped(&mut self) {
        self.dropped = true;
        self.visible = false;
    }
}

/// Queries an action message may run against an object.
pub trait ReadOnlyObjectView {
    fn id(&self) -> ObjectId;
    fn name(&self) -> &str;
    fn is_visible(&self) -> bool;
    fn is_dropped(&self) -> bool;
    /// Whether the object is currently in the inventory.
    fn is_held(&self) -> bool;
    /// Whether the object is the selected inventory item.
    fn is_selected(&self) -> bool;
}

/// Mutations an action callback may apply to an object.
pub trait MutableObjectView: ReadOnlyObjectView {
    /// Make the object visible in the world. No effect once dropped.
    fn show(&mut self);
    fn hide(&mut self);
    /// Move the object from the world into the inventory.
    fn put_in_inventory(&mut self) -> Result<()>;
    /// Remove the object from the inventory for good.
    fn drop_from_inventory(&mut self) -> Result<()>;
}

/// The mutable game state actions operate on: scene objects and the inventory.
pub struct Stage {
    pub(crate) scene: SceneIndex,
    pub(crate) inventory: Inventory,
}

impl Stage {
    pub fn new(scene: SceneIndex, inventory: Inventory) -> Self {
        Self { scene, inventory }
    }

    pub fn scene(&self) -> &SceneIndex {
        &self.scene
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn object(&self, id: ObjectId) -> ObjectRef<'_> {
        ObjectRef { stage: self, id }
    }

    pub fn object_mut(&mut self, id: ObjectId) -> ObjectMut<'_> {
        ObjectMut { stage: self, id }
    }
}

/// Read-only capability over one object.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    stage: &'a Stage,
    id: ObjectId,
}

impl ReadOnlyObjectView for ObjectRef<'_> {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> &str {
        self.stage.scene.object(self.id).name()
    }

    fn is_visible(&self) -> bool {
        self.stage.scene.object(self.id).is_visible()
    }

    fn is_dropped(&self) -> bool {
        self.stage.scene.object(self.id).is_dropped()
    }

    fn is_held(&self) -> bool {
        self.stage.inventory.is_held(self.id)
    }

    fn is_selected(&self) -> bool {
        self.stage.inventory.is_selected(self.id)
    }
}

/// Mutable capability over one object.
pub struct ObjectMut<'a> {
    stage: &'a mut Stage,
    id: ObjectId,
}

impl ReadOnlyObjectView for ObjectMut<'_> {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> &str {
        self.stage.scene.object(self.id).name()
    }

    fn is_visible(&self) -> bool {
        self.stage.scene.object(self.id).is_visible()
    }

    fn is_dropped(&self) -> bool {
        self.stage.scene.object(self.id).is_dropped()
    }

    fn is_held(&self) -> bool {
        self.stage.inventory.is_held(self.id)
    }

    fn is_selected(&self) -> bool {
        self.stage.inventory.is_selected(self.id)
    }
}

impl MutableObjectView for ObjectMut<'_> {
    fn show(&mut self) {
        if self.stage.inventory.is_held(self.id) {
            tracing::debug!(
                "'{}' is in the inventory, staying hidden",
                self.stage.scene.object(self.id).name()
            );
            return;
        }
        let object = self.stage.scene.object_mut(self.id);
        if !object.set_visible(true) {
            tracing::debug!("'{}' was dropped, staying hidden", object.name());
        }
    }

    fn hide(&mut self) {
        self.stage.scene.object_mut(self.id).set_visible(false);
    }

    fn put_in_inventory(&mut self) -> Result<()> {
        let Stage { scene, inventory } = &mut *self.stage;
        inventory.collect(scene, self.id)
    }

    fn drop_from_inventory(&mut self) -> Result<()> {
        let Stage { scene, inventory } = &mut *self.stage;
        inventory.drop(scene, self.id)
    }
}
