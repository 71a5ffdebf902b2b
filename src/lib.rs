//! # Escape Room
//!
//! **A point-and-click escape room framework: views, links, actions and an inventory.**
//!
//! A scene is a set of named entities. Some are interactive objects, some are
//! props, and pairs of `<view>_camera` / `<view>_lookat` markers define the
//! viewpoints the player can stand at. Scenario code links views together
//! with directional buttons and binds actions to objects; the framework does
//! the rest: camera transitions, tooltips, highlighting, the inventory strip
//! and the final message.
//!
//! ## Quick Start
//!
//! ```no_run
//! use escape_room::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let scene = SceneIndex::from_entities(vec![
//!         SceneEntity::marker("desk_camera", Vec3::new(0.0, 1.5, 4.0)),
//!         SceneEntity::marker("desk_lookat", Vec3::new(0.0, 1.0, 0.0)),
//!         SceneEntity::marker("door_camera", Vec3::new(4.0, 1.5, 0.0)),
//!         SceneEntity::marker("door_lookat", Vec3::new(0.0, 1.0, 0.0)),
//!         SceneEntity::object("key", Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, 0.05, 0.1)),
//!     ])?;
//!
//!     run(GameConfig::new().title("The Study"), scene, |game| {
//!         game.author(|handler, scene| {
//!             handler.set_initial_view("desk");
//!             handler.set_view_links("desk", Links::new().right("door"));
//!             handler.set_view_links("door", Links::new().left("desk"));
//!             handler.set_take_object_action(scene, "desk", "key", "A small brass key")
//!         })
//!     })
//! }
//! ```
//!
//! ## Shape of the crate
//!
//! - [`GameHandler`] owns the views and which one is current, and runs actions.
//! - [`World`] owns the primary camera and its [`CameraAnimator`].
//! - [`Inventory`] holds collected objects and lays them out in their own region.
//! - [`Overlay`] paints buttons, tooltips and messages into a [`Canvas`].
//! - [`RenderCompositor`] draws both regions through a [`RenderBackend`].
//! - [`Game`] ties them together behind one [`tick`](Game::tick).
//!
//! Action callbacks only see the capabilities they are given:
//! [`ReadOnlyObjectView`] for messages, [`MutableObjectView`] and
//! [`NavigationCapability`] for callbacks.

mod app;
mod backend;
mod camera;
mod compositor;
mod config;
mod draw2d;
mod error;
mod game;
mod gpu;
mod handler;
mod input;
mod inventory;
mod logging;
mod object;
mod overlay;
mod picking;
mod quad_pass;
mod scene_index;
mod world;

pub use app::{run, run_game};
pub use backend::{WgpuBackend, paint_world, project_drawable};
pub use camera::{Camera, Pose};
pub use compositor::{
    Region, RenderBackend, RenderCompositor, Viewport, WorldPass, pixel_to_ndc,
};
pub use config::{GameConfig, OverflowPolicy};
pub use draw2d::{Canvas, Color, DrawCommand, DrawSurface, GLYPH_SIZE, Rect};
pub use error::{Error, Result};
pub use game::{Game, TickHook};
pub use gpu::GpuContext;
pub use handler::{
    Action, ActionCallback, ActionContext, GameHandler, HandlerState, INVENTORY_FULL_MESSAGE,
    Links, Message, MessageFn, NavigationCapability, NavigationRequests, Systems, View, ViewName,
};
pub use input::{PointerEvent, PointerInput};
pub use inventory::{Inventory, LAYOUT_EXTENT, slot_layout};
pub use logging::init_logging;
pub use object::{
    GameObject, MutableObjectView, ObjectId, ObjectMut, ObjectRef, ReadOnlyObjectView, Stage,
};
pub use overlay::{Direction, DirectionSet, Overlay};
pub use picking::{Collider, ColliderPicker, Picker, Ray, RayHit};
pub use quad_pass::{QuadBatch, QuadPass, QuadVertex};
pub use scene_index::{
    Bounds, CAMERA_SUFFIX, Drawable, LOOKAT_SUFFIX, SceneEntity, SceneIndex, SlotTransform,
    Transform,
};
pub use world::{CameraAnimator, World};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
