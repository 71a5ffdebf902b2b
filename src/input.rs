use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// A pointer event in window pixels, ready for [`Game`](crate::Game).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Pressed(Vec2),
    Left,
}

/// Tracks the cursor and turns window events into [`PointerEvent`]s.
///
/// Only the primary (left) button produces presses; a press is reported
/// once per click, on the down edge.
#[derive(Debug, Default)]
pub struct PointerInput {
    position: Option<Vec2>,
    primary_down: bool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.button(*state, *button),
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> PointerEvent {
        self.position = Some(position);
        PointerEvent::Moved(position)
    }

    pub fn cursor_left(&mut self) -> Option<PointerEvent> {
        self.primary_down = false;
        self.position.take().map(|_| PointerEvent::Left)
    }

    pub fn button(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed if !self.primary_down => {
                self.primary_down = true;
                self.position.map(PointerEvent::Pressed)
            }
            ElementState::Pressed => None,
            ElementState::Released => {
                self.primary_down = false;
                None
            }
        }
    }

    /// Last known cursor position inside the window.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_reported_at_cursor() {
        let mut input = PointerInput::new();
        assert_eq!(input.button(ElementState::Pressed, MouseButton::Left), None);
        input.button(ElementState::Released, MouseButton::Left);

        let at = Vec2::new(40.0, 60.0);
        assert_eq!(input.cursor_moved(at), PointerEvent::Moved(at));
        assert_eq!(
            input.button(ElementState::Pressed, MouseButton::Left),
            Some(PointerEvent::Pressed(at))
        );
        // Repeated down events without a release are one click.
        assert_eq!(input.button(ElementState::Pressed, MouseButton::Left), None);
        input.button(ElementState::Released, MouseButton::Left);
        assert!(input.button(ElementState::Pressed, MouseButton::Left).is_some());
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut input = PointerInput::new();
        input.cursor_moved(Vec2::ONE);
        assert_eq!(input.button(ElementState::Pressed, MouseButton::Right), None);
        assert_eq!(input.button(ElementState::Pressed, MouseButton::Middle), None);
    }

    #[test]
    fn leaving_forgets_position() {
        let mut input = PointerInput::new();
        assert_eq!(input.cursor_left(), None);
        input.cursor_moved(Vec2::ONE);
        assert_eq!(input.cursor_left(), Some(PointerEvent::Left));
        assert_eq!(input.position(), None);
    }
}
