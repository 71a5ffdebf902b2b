//! Runtime configuration for a game session.

use crate::draw2d::Color;

/// What [`Inventory::collect`](crate::Inventory::collect) does once every slot is taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Refuse the item; it stays where it is in the world.
    #[default]
    Reject,
    /// Accept the item and shrink every slot to make room.
    Crowd,
}

/// Window, layout and pacing settings.
///
/// # Example
///
/// ```
/// use escape_room::GameConfig;
///
/// let config = GameConfig::new()
///     .title("The Study")
///     .size(1280, 720)
///     .inventory_capacity(4)
///     .transition_steps(45);
/// assert_eq!(config.inventory_capacity, 4);
/// ```
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Width in pixels of the inventory strip on the right edge.
    pub inventory_width: f32,
    pub inventory_capacity: usize,
    pub overflow: OverflowPolicy,
    /// Number of ticks a camera transition between two views takes.
    pub transition_steps: usize,
    /// Number of ticks a transient message stays on screen.
    pub message_ticks: u32,
    /// Fraction of the primary viewport covered by each navigation band.
    pub button_band: f32,
    pub background: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Escape Room".to_string(),
            width: 1280,
            height: 720,
            inventory_width: 200.0,
            inventory_capacity: 3,
            overflow: OverflowPolicy::Reject,
            transition_steps: 60,
            message_ticks: 180,
            button_band: 0.1,
            background: Color::rgb(0.05, 0.05, 0.07),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn inventory_width(mut self, width: f32) -> Self {
        self.inventory_width = width;
        self
    }

    pub fn inventory_capacity(mut self, capacity: usize) -> Self {
        self.inventory_capacity = capacity;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Clamped to at least one step.
    pub fn transition_steps(mut self, steps: usize) -> Self {
        self.transition_steps = steps.max(1);
        self
    }

    pub fn message_ticks(mut self, ticks: u32) -> Self {
        self.message_ticks = ticks;
        self
    }

    /// Clamped to `0.0..=0.5` so opposite bands never overlap.
    pub fn button_band(mut self, fraction: f32) -> Self {
        self.button_band = fraction.clamp(0.0, 0.5);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}
