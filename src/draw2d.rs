//! Screen-space 2D drawing primitives and the HUD draw surface.
//!
//! The overlay never draws to the final output directly. It paints into a
//! [`Canvas`], a recorded list of [`DrawCommand`]s that a
//! [`RenderBackend`](crate::RenderBackend) composites on top of the primary
//! region's world pass.

use glam::Vec2;

/// Side length in pixels of one unscaled bitmap glyph.
pub const GLYPH_SIZE: f32 = 8.0;

/// A rectangle in screen-space pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two opposite corners in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }

    /// The overlapping part of two rectangles, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        if max.x > min.x && max.y > min.y {
            Some(Rect::from_corners(min, max))
        } else {
            None
        }
    }

    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// RGBA color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Translucent panel behind tooltips and messages.
    pub const PANEL_BG: Color = Color::rgba(0.08, 0.08, 0.1, 0.8);
    /// Navigation button at rest.
    pub const BUTTON: Color = Color::rgba(0.9, 0.9, 0.9, 0.35);
    /// Navigation button under the pointer.
    pub const BUTTON_HOVER: Color = Color::rgba(1.0, 0.85, 0.3, 0.8);
    /// Outline drawn around highlighted objects.
    pub const HIGHLIGHT: Color = Color::rgba(1.0, 0.75, 0.1, 1.0);

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Text {
        position: Vec2,
        text: String,
        color: Color,
        scale: f32,
    },
}

/// A bitmap drawing surface the HUD paints on.
pub trait DrawSurface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw a single line of text with its top-left corner at `position`.
    fn text(&mut self, position: Vec2, text: &str, color: Color, scale: f32);

    /// Size in pixels `text` would occupy at `scale`.
    fn measure_text(&self, text: &str, scale: f32) -> Vec2 {
        let glyph = GLYPH_SIZE * scale;
        Vec2::new(text.chars().count() as f32 * glyph, glyph)
    }
}

/// Recorded draw surface.
///
/// Every [`clear`](DrawSurface::clear) starts a new revision, which lets a
/// compositor (and tests) tell whether the surface was actually repainted.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    commands: Vec<DrawCommand>,
    revision: u64,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the canvas has been cleared for a repaint.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Draw the recorded commands onto `surface`, shifted by `offset`.
    pub fn replay(&self, surface: &mut dyn DrawSurface, offset: Vec2) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect { rect, color } => {
                    surface.fill_rect(rect.translate(offset), *color)
                }
                DrawCommand::StrokeRect { rect, color, width } => {
                    surface.stroke_rect(rect.translate(offset), *color, *width)
                }
                DrawCommand::Text {
                    position,
                    text,
                    color,
                    scale,
                } => surface.text(*position + offset, text, *color, *scale),
            }
        }
    }

    /// Text of every text command, in draw order.
    pub fn text_content(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for Canvas {
    fn clear(&mut self) {
        self.commands.clear();
        self.revision += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn text(&mut self, position: Vec2, text: &str, color: Color, scale: f32) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
            scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(29.9, 29.9)));
        assert!(!rect.contains(Vec2::new(30.0, 15.0)));
        assert!(!rect.contains(Vec2::new(9.9, 15.0)));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(&Rect::new(20.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn canvas_records_and_clears() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        canvas.text(Vec2::ZERO, "hello", Color::WHITE, 1.0);
        assert_eq!(canvas.commands().len(), 2);
        assert_eq!(canvas.text_content(), vec!["hello"]);

        canvas.clear();
        assert!(canvas.is_empty());
        assert_eq!(canvas.revision(), 1);
    }

    #[test]
    fn measure_text_uses_glyph_grid() {
        let canvas = Canvas::new();
        assert_eq!(canvas.measure_text("abcd", 2.0), Vec2::new(64.0, 16.0));
    }

    #[test]
    fn replay_shifts_commands() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::BLACK);
        canvas.text(Vec2::new(5.0, 5.0), "hi", Color::WHITE, 1.0);

        let mut target = Canvas::new();
        canvas.replay(&mut target, Vec2::new(100.0, 10.0));
        assert_eq!(
            target.commands()[0],
            DrawCommand::FillRect {
                rect: Rect::new(101.0, 12.0, 3.0, 4.0),
                color: Color::BLACK
            }
        );
        assert!(matches!(
            &target.commands()[1],
            DrawCommand::Text { position, .. } if *position == Vec2::new(105.0, 15.0)
        ));
    }
}
