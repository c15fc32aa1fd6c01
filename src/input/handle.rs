//! The device pair owned by the frame loop, and its producer handle.

use super::keyboard::{KeyEvent, Keyboard};
use super::pointer::{Pointer, PointerEvent};
use super::queue::EventSender;
use super::state::DrainReport;

/// Keyboard and pointer devices read once per loop iteration.
#[derive(Debug, Default)]
pub struct Input {
    /// Keyboard state.
    pub keyboard: Keyboard,
    /// Pointer state.
    pub pointer: Pointer,
}

impl Input {
    /// Fresh devices with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer handle for host threads.
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            keyboard: self.keyboard.sender(),
            pointer: self.pointer.sender(),
        }
    }

    /// Drain both devices, keyboard first.
    pub fn read_input(&mut self) -> DrainReport {
        let keys = self.keyboard.read_input();
        let pointer = self.pointer.read_input();
        DrainReport {
            applied: keys.applied + pointer.applied,
            rejected: keys.rejected + pointer.rejected,
        }
    }

    /// Handle loss of input focus.
    ///
    /// Undrained events of both devices are discarded and every pointer
    /// button is forced back to `None`. Keyboard slots keep their state.
    pub fn focus_lost(&mut self) {
        let dropped = self.keyboard.clear_events_buffer() + self.pointer.clear_events_buffer();
        self.release_focus();
        tracing::debug!(dropped, "input focus lost");
    }

    /// Loop-side half of focus loss: release every pointer button and clear
    /// the focus flag. Queues are left alone, so this pairs with
    /// [`InputHandle::clear_pending`] called where the loss was observed.
    pub fn release_focus(&mut self) {
        self.pointer.reset();
        self.pointer.set_focus(false);
    }

    /// Handle regaining input focus.
    pub fn focus_gained(&mut self) {
        self.pointer.set_focus(true);
        tracing::debug!("input focus gained");
    }
}

/// Cloneable, `Send` handle through which a host delivers raw input.
#[derive(Debug, Clone)]
pub struct InputHandle {
    keyboard: EventSender<KeyEvent>,
    pointer: EventSender<PointerEvent>,
}

impl InputHandle {
    /// Queue a key event. Returns `false` if the keyboard queue is full.
    #[inline]
    pub fn push_key(&self, event: KeyEvent) -> bool {
        self.keyboard.push(event)
    }

    /// Queue a pointer event. Returns `false` if the pointer queue is full.
    #[inline]
    pub fn push_pointer(&self, event: PointerEvent) -> bool {
        self.pointer.push(event)
    }

    /// Discard undrained events of both devices right now.
    ///
    /// Returns the number of events dropped.
    pub fn clear_pending(&self) -> usize {
        self.keyboard.clear() + self.pointer.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonState, KeyCode, KeyModifiers, MouseButton, MouseButtons, Point};
    use std::thread;

    #[test]
    fn test_handle_from_other_thread() {
        let mut input = Input::new();
        let handle = input.handle();

        thread::spawn(move || {
            assert!(handle.push_key(KeyEvent::down(KeyCode::W, KeyModifiers::empty())));
            assert!(handle.push_pointer(PointerEvent::down(MouseButtons::LEFT, Point::new(2, 2))));
        })
        .join()
        .unwrap();

        let report = input.read_input();
        assert_eq!(report.applied, 2);
        assert!(input.keyboard.is_down(KeyCode::W));
        assert!(input.pointer.is_down(MouseButton::Left));
    }

    #[test]
    fn test_focus_loss_discards_pending_events() {
        let mut input = Input::new();
        let handle = input.handle();
        handle.push_key(KeyEvent::down(KeyCode::A, KeyModifiers::empty()));
        handle.push_pointer(PointerEvent::down(MouseButtons::RIGHT, Point::ZERO));
        input.read_input();

        // Pending releases never reach the tables.
        handle.push_key(KeyEvent::released(KeyCode::A, KeyModifiers::empty()));
        handle.push_key(KeyEvent::down(KeyCode::D, KeyModifiers::empty()));
        input.focus_lost();
        let report = input.read_input();

        assert_eq!(report.drained(), 0);
        assert_eq!(input.keyboard.state(KeyCode::A), ButtonState::Down);
        assert_eq!(input.keyboard.state(KeyCode::D), ButtonState::None);
        assert_eq!(input.pointer.state(MouseButton::Right), ButtonState::None);
        assert!(!input.pointer.has_focus());

        input.focus_gained();
        assert!(input.pointer.has_focus());
    }

    #[test]
    fn test_clear_pending_keeps_later_events() {
        let mut input = Input::new();
        let handle = input.handle();
        handle.push_key(KeyEvent::down(KeyCode::A, KeyModifiers::empty()));
        handle.push_pointer(PointerEvent::down(MouseButtons::LEFT, Point::ZERO));
        assert_eq!(handle.clear_pending(), 2);

        // Pushed after the loss: must survive the loop-side handling.
        handle.push_key(KeyEvent::down(KeyCode::D, KeyModifiers::empty()));
        input.release_focus();
        input.read_input();

        assert!(!input.keyboard.is_down(KeyCode::A));
        assert!(input.keyboard.is_down(KeyCode::D));
        assert!(!input.pointer.is_down(MouseButton::Left));
        assert!(!input.pointer.has_focus());
    }
}
