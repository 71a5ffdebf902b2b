//! The HUD drawn over the primary region.
//!
//! The overlay shows up to four navigation buttons in bands along the edges
//! of the primary viewport, a tooltip following the pointer, a short-lived
//! message and, once the game is over, a final message. It only repaints its
//! [`Canvas`] when something visible changed.
//!
//! ```text
//!  +---+-------------+---+
//!  |   |     top     |   |
//!  +---+-------------+---+
//!  | l |             | r |
//!  | e |   (dead)    | i |
//!  | f |             | g |
//!  | t |             | h |
//!  +---+-------------+---+
//!  |   |   bottom    |   |
//!  +---+-------------+---+
//! ```
//!
//! Corners belong to no button.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::config::GameConfig;
use crate::draw2d::{Canvas, Color, DrawSurface, Rect};
use crate::error::Error;

const BUTTON_TEXT_SCALE: f32 = 3.0;
const TOOLTIP_TEXT_SCALE: f32 = 2.0;
const MESSAGE_TEXT_SCALE: f32 = 2.0;
const FINAL_TEXT_SCALE: f32 = 3.0;
const TOOLTIP_OFFSET: Vec2 = Vec2::new(16.0, 16.0);
const PADDING: f32 = 6.0;

/// One of the four navigation directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Top,
        Direction::Bottom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        }
    }

    /// Glyph painted on the button.
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Left => "<",
            Direction::Right => ">",
            Direction::Top => "^",
            Direction::Bottom => "v",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::UnknownDirection(s.to_string()))
    }
}

/// A subset of the four directions.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::EMPTY;
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Tooltip {
    text: String,
    position: Vec2,
}

#[derive(Clone, Debug)]
struct TransientMessage {
    text: String,
    ticks_left: u32,
}

pub struct Overlay {
    size: Vec2,
    band: f32,
    message_ticks: u32,
    active: DirectionSet,
    hovered: Option<Direction>,
    tooltip: Option<Tooltip>,
    transient: Option<TransientMessage>,
    final_message: Option<String>,
    frozen: bool,
    dirty: bool,
    canvas: Canvas,
}

impl Overlay {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            size: Vec2::new(
                (config.width as f32 - config.inventory_width).max(0.0),
                config.height as f32,
            ),
            band: config.button_band,
            message_ticks: config.message_ticks,
            active: DirectionSet::EMPTY,
            hovered: None,
            tooltip: None,
            transient: None,
            final_message: None,
            frozen: false,
            dirty: true,
            canvas: Canvas::new(),
        }
    }

    /// Follow a change of the primary region's size in pixels.
    ///
    /// A frozen overlay keeps the final message it already painted.
    pub fn resize(&mut self, size: Vec2) {
        if size != self.size {
            self.size = size;
            self.dirty |= !self.frozen;
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The button band under `position`, whether or not its button is shown.
    pub fn zone_at(&self, position: Vec2) -> Option<Direction> {
        let Vec2 { x, y } = position;
        let (w, h) = (self.size.x, self.size.y);
        if x < 0.0 || y < 0.0 || x >= w || y >= h {
            return None;
        }
        let (bw, bh) = (w * self.band, h * self.band);
        let middle_x = x >= bw && x < w - bw;
        let middle_y = y >= bh && y < h - bh;

        if middle_y && x < bw {
            Some(Direction::Left)
        } else if middle_y && x >= w - bw {
            Some(Direction::Right)
        } else if middle_x && y < bh {
            Some(Direction::Top)
        } else if middle_x && y >= h - bh {
            Some(Direction::Bottom)
        } else {
            None
        }
    }

    /// The shown button under `position`, if any.
    pub fn button_at(&self, position: Vec2) -> Option<Direction> {
        self.zone_at(position).filter(|d| self.active.contains(*d))
    }

    pub fn set_active_buttons(&mut self, buttons: DirectionSet) {
        if self.frozen || buttons == self.active {
            return;
        }
        self.active = buttons;
        if self.hovered.is_some_and(|d| !buttons.contains(d)) {
            self.hovered = None;
        }
        self.dirty = true;
    }

    pub fn active_buttons(&self) -> DirectionSet {
        self.active
    }

    /// Track the pointer over the buttons; returns the hovered button.
    pub fn hover(&mut self, position: Vec2) -> Option<Direction> {
        if self.frozen {
            return None;
        }
        let hovered = self.button_at(position);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.dirty = true;
        }
        hovered
    }

    pub fn hovered(&self) -> Option<Direction> {
        self.hovered
    }

    /// Show `text` next to the pointer, or hide the tooltip with `None`.
    pub fn set_tooltip(&mut self, text: Option<String>, position: Vec2) {
        if self.frozen {
            return;
        }
        let tooltip = text.map(|text| Tooltip { text, position });
        if tooltip != self.tooltip {
            self.tooltip = tooltip;
            self.dirty = true;
        }
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|t| t.text.as_str())
    }

    /// Drop the hovered button and the tooltip.
    pub fn clear_interaction(&mut self) {
        if self.hovered.is_some() || self.tooltip.is_some() {
            self.hovered = None;
            self.tooltip = None;
            self.dirty = true;
        }
    }

    /// Show a message for the configured number of ticks.
    pub fn show_message(&mut self, text: impl Into<String>) {
        if self.frozen {
            return;
        }
        self.transient = Some(TransientMessage {
            text: text.into(),
            ticks_left: self.message_ticks.max(1),
        });
        self.dirty = true;
    }

    pub fn message(&self) -> Option<&str> {
        self.transient.as_ref().map(|m| m.text.as_str())
    }

    /// Count down the transient message by one tick.
    pub fn tick(&mut self) {
        if self.frozen {
            return;
        }
        if let Some(message) = &mut self.transient {
            message.ticks_left = message.ticks_left.saturating_sub(1);
            if message.ticks_left == 0 {
                self.transient = None;
                self.dirty = true;
            }
        }
    }

    /// End the game: show `message` and stop reacting to anything.
    pub fn freeze(&mut self, message: impl Into<String>) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        self.final_message = Some(message.into());
        self.active = DirectionSet::EMPTY;
        self.hovered = None;
        self.tooltip = None;
        self.transient = None;
        self.dirty = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn final_message(&self) -> Option<&str> {
        self.final_message.as_deref()
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Repaint the canvas if anything changed; returns whether it did.
    pub fn redraw(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;

        let mut canvas = std::mem::take(&mut self.canvas);
        canvas.clear();
        self.paint(&mut canvas);
        self.canvas = canvas;
        true
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn paint(&self, surface: &mut dyn DrawSurface) {
        if self.frozen {
            if let Some(message) = &self.final_message {
                surface.fill_rect(
                    Rect::new(0.0, 0.0, self.size.x, self.size.y),
                    Color::rgba(0.0, 0.0, 0.0, 0.6),
                );
                let text_size = surface.measure_text(message, FINAL_TEXT_SCALE);
                let origin = (self.size - text_size) * 0.5;
                surface.text(origin, message, Color::WHITE, FINAL_TEXT_SCALE);
            }
            return;
        }

        for direction in self.active.iter() {
            let rect = self.button_rect(direction);
            let color = if self.hovered == Some(direction) {
                Color::BUTTON_HOVER
            } else {
                Color::BUTTON
            };
            surface.fill_rect(rect, color);
            let arrow = direction.arrow();
            let text_size = surface.measure_text(arrow, BUTTON_TEXT_SCALE);
            surface.text(
                rect.center() - text_size * 0.5,
                arrow,
                Color::BLACK,
                BUTTON_TEXT_SCALE,
            );
        }

        if let Some(tooltip) = &self.tooltip {
            let text_size = surface.measure_text(&tooltip.text, TOOLTIP_TEXT_SCALE);
            let box_size = text_size + Vec2::splat(PADDING * 2.0);
            let origin = (tooltip.position + TOOLTIP_OFFSET)
                .min(self.size - box_size)
                .max(Vec2::ZERO);
            surface.fill_rect(Rect::new(origin.x, origin.y, box_size.x, box_size.y), Color::PANEL_BG);
            surface.text(
                origin + Vec2::splat(PADDING),
                &tooltip.text,
                Color::WHITE,
                TOOLTIP_TEXT_SCALE,
            );
        }

        if let Some(message) = &self.transient {
            let text_size = surface.measure_text(&message.text, MESSAGE_TEXT_SCALE);
            let box_size = text_size + Vec2::splat(PADDING * 2.0);
            let origin = Vec2::new(
                (self.size.x - box_size.x) * 0.5,
                self.size.y * (1.0 - self.band) - box_size.y - PADDING,
            )
            .max(Vec2::ZERO);
            surface.fill_rect(Rect::new(origin.x, origin.y, box_size.x, box_size.y), Color::PANEL_BG);
            surface.text(
                origin + Vec2::splat(PADDING),
                &message.text,
                Color::WHITE,
                MESSAGE_TEXT_SCALE,
            );
        }
    }

    /// Where the button for `direction` is painted.
    pub fn button_rect(&self, direction: Direction) -> Rect {
        let (w, h) = (self.size.x, self.size.y);
        let (bw, bh) = (w * self.band, h * self.band);
        let side = bw.min(bh) * 0.8;
        let center = match direction {
            Direction::Left => Vec2::new(bw * 0.5, h * 0.5),
            Direction::Right => Vec2::new(w - bw * 0.5, h * 0.5),
            Direction::Top => Vec2::new(w * 0.5, bh * 0.5),
            Direction::Bottom => Vec2::new(w * 0.5, h - bh * 0.5),
        };
        Rect::new(center.x - side * 0.5, center.y - side * 0.5, side, side)
    }
}
