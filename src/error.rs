//! Error types for the escape room runtime.

use thiserror::Error;

/// Main error type for scene loading, authoring and gameplay operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An object name was used that no interactive entity carries.
    #[error("unknown object '{0}'")]
    UnknownObject(String),

    /// A view has no `<view>_camera` / `<view>_lookat` pair in the scene.
    #[error("no camera pose registered for view '{0}'")]
    MissingPose(String),

    /// A direction token other than left, right, top or bottom.
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    /// `GameHandler::set_initial_view` was never called before starting.
    #[error("initial view was never set")]
    NoInitialView,

    /// Two scene entities share a name.
    #[error("duplicate scene entity name '{0}'")]
    DuplicateEntity(String),

    /// The object is not currently in the inventory.
    #[error("object '{0}' is not in the inventory")]
    NotHeld(String),

    /// The object was dropped and can never be collected again.
    #[error("object '{0}' was dropped and cannot be collected again")]
    Dropped(String),

    /// The inventory refuses to hold more items.
    #[error("inventory is full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    /// A selection toggle referenced a slot that does not exist.
    #[error("selection index {index} out of range for {len} held items")]
    SelectionOutOfRange { index: usize, len: usize },

    /// Window creation or management errors
    #[error("window error: {0}")]
    Window(String),

    /// GPU initialization or surface errors
    #[error("GPU error: {0}")]
    Gpu(String),

    /// The platform event loop failed
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
