//! Input event queue
//!
//! DOM listeners push events as they arrive; the frame loop drains them into
//! the next simulation tick.

use glam::Vec2;

use crate::sim::{PointerEvent, TickInput};

/// Raw input, already mapped to world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    Press(Vec2),
    Move(Vec2),
    Release(Vec2),
    Restart,
}

#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<PointerEvent>,
    restart: bool,
    quit: bool,
    /// A button or finger is down
    pressed: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.quit = true,
            InputEvent::Restart => self.restart = true,
            InputEvent::Press(p) => {
                self.pressed = true;
                self.pending.push(PointerEvent::Press(p));
            }
            InputEvent::Move(p) => {
                // hover moves carry no meaning for the simulation
                if self.pressed {
                    self.pending.push(PointerEvent::Move(p));
                }
            }
            InputEvent::Release(p) => {
                if self.pressed {
                    self.pressed = false;
                    self.pending.push(PointerEvent::Release(p));
                }
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && !self.restart
    }

    /// Move queued events into the next tick's input
    pub fn drain_into(&mut self, input: &mut TickInput) {
        input.pointer.append(&mut self.pending);
        input.restart |= std::mem::take(&mut self.restart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_moves_are_dropped() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Move(Vec2::new(1.0, 1.0)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_drag_drains_in_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Press(Vec2::new(1.0, 1.0)));
        q.push(InputEvent::Move(Vec2::new(2.0, 1.0)));
        q.push(InputEvent::Release(Vec2::new(3.0, 1.0)));
        q.push(InputEvent::Move(Vec2::new(4.0, 1.0)));

        let mut input = TickInput::default();
        q.drain_into(&mut input);
        assert_eq!(
            input.pointer,
            vec![
                PointerEvent::Press(Vec2::new(1.0, 1.0)),
                PointerEvent::Move(Vec2::new(2.0, 1.0)),
                PointerEvent::Release(Vec2::new(3.0, 1.0)),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Release(Vec2::ZERO));
        assert!(q.is_empty());
    }

    #[test]
    fn test_restart_is_one_shot() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Restart);
        let mut input = TickInput::default();
        q.drain_into(&mut input);
        assert!(input.restart);

        let mut next = TickInput::default();
        q.drain_into(&mut next);
        assert!(!next.restart);
    }

    #[test]
    fn test_quit_is_sticky() {
        let mut q = InputQueue::new();
        assert!(!q.quit_requested());
        q.push(InputEvent::Quit);
        q.drain_into(&mut TickInput::default());
        assert!(q.quit_requested());
    }
}
