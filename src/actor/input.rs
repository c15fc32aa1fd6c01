//! Terminal Input: dedicated thread translating crossterm events.
//!
//! This thread is the producer side of the input queues. It polls crossterm,
//! converts key, mouse and focus events into raw device events and pushes
//! them through a [`HostHandle`] without ever blocking on the frame loop.

use super::messages::{HostHandle, HostSignal};
use crate::input::{
    KeyCode, KeyEvent, KeyModifiers, LockKeys, MouseButtons, Point, PointerEvent, WHEEL_DELTA,
};
use crate::terminal::TerminalSession;
use crossterm::event::{self, Event, KeyEventKind, KeyEventState, ModifierKeyCode, MouseEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input thread feeding a terminal session's events to the engine.
pub struct TerminalInput {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl TerminalInput {
    /// Spawn the input thread for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(host: HostHandle, session: &TerminalSession) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let poll_timeout = session.config().poll_timeout;
        let synthesize_release = !session.reports_key_releases();

        let handle = thread::Builder::new()
            .name("pulseloop-input".to_string())
            .spawn(move || {
                Self::run_loop(&host, &shutdown_clone, poll_timeout, synthesize_release);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(
        host: &HostHandle,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        synthesize_release: bool,
    ) {
        while !shutdown.load(Ordering::Relaxed) {
            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if !dispatch(host, event, synthesize_release) {
                            // Engine dropped, nobody left to feed.
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "failed to poll terminal events"),
            }
        }
        tracing::debug!("terminal input thread exiting");
    }
}

impl Drop for TerminalInput {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Push one crossterm event into the engine.
///
/// Returns `false` once the engine is gone. Queue overflow is not an error
/// here: the dropped event is simply lost.
pub fn dispatch(host: &HostHandle, event: Event, synthesize_release: bool) -> bool {
    match event {
        Event::Key(key) => {
            if is_interrupt(&key) {
                return host.close();
            }
            if let Some(converted) = convert_key(&key) {
                host.push_key(converted);
                if synthesize_release && key.kind == KeyEventKind::Press {
                    host.push_key(
                        KeyEvent::released(converted.code, converted.modifiers)
                            .with_locks(converted.locks),
                    );
                }
            }
            true
        }
        Event::Mouse(mouse) => {
            if let Some(converted) = convert_mouse(&mouse) {
                host.push_pointer(converted);
            }
            true
        }
        Event::FocusGained => host.signal(HostSignal::FocusGained),
        Event::FocusLost => host.focus_lost(),
        _ => true,
    }
}

/// Ctrl+C: raw mode swallows SIGINT, so treat it as a close request.
fn is_interrupt(key: &event::KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.code == event::KeyCode::Char('c')
        && key.modifiers.contains(event::KeyModifiers::CONTROL)
}

/// Convert a crossterm key event. Repeats and unmapped keys yield `None`.
pub fn convert_key(key: &event::KeyEvent) -> Option<KeyEvent> {
    let code = convert_key_code(key.code)?;
    let modifiers = convert_modifiers(key.modifiers);
    let event = match key.kind {
        KeyEventKind::Press => KeyEvent::down(code, modifiers),
        KeyEventKind::Release => KeyEvent::released(code, modifiers),
        // Already down.
        KeyEventKind::Repeat => return None,
    };
    Some(event.with_locks(convert_locks(key.state)))
}

/// Convert crossterm lock state. Terminals never report Scroll Lock.
pub fn convert_locks(state: KeyEventState) -> LockKeys {
    let mut locks = LockKeys::empty();
    locks.set(LockKeys::CAPS_LOCK, state.contains(KeyEventState::CAPS_LOCK));
    locks.set(LockKeys::NUM_LOCK, state.contains(KeyEventState::NUM_LOCK));
    locks
}

/// Convert a crossterm key code to a virtual key code.
pub fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(' ') => KeyCode::SPACE,
        event::KeyCode::Char(c) => return KeyCode::from_char(c),
        event::KeyCode::F(n) => return KeyCode::function(n),
        event::KeyCode::Backspace => KeyCode::BACKSPACE,
        event::KeyCode::Enter => KeyCode::ENTER,
        event::KeyCode::Left => KeyCode::LEFT,
        event::KeyCode::Right => KeyCode::RIGHT,
        event::KeyCode::Up => KeyCode::UP,
        event::KeyCode::Down => KeyCode::DOWN,
        event::KeyCode::Home => KeyCode::HOME,
        event::KeyCode::End => KeyCode::END,
        event::KeyCode::PageUp => KeyCode::PAGE_UP,
        event::KeyCode::PageDown => KeyCode::PAGE_DOWN,
        event::KeyCode::Tab | event::KeyCode::BackTab => KeyCode::TAB,
        event::KeyCode::Delete => KeyCode::DELETE,
        event::KeyCode::Insert => KeyCode::INSERT,
        event::KeyCode::Esc => KeyCode::ESCAPE,
        event::KeyCode::CapsLock => KeyCode::CAPS_LOCK,
        event::KeyCode::ScrollLock => KeyCode::SCROLL_LOCK,
        event::KeyCode::NumLock => KeyCode::NUM_LOCK,
        event::KeyCode::Pause => KeyCode::PAUSE,
        event::KeyCode::Modifier(modifier) => match modifier {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => KeyCode::SHIFT,
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => KeyCode::CONTROL,
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => KeyCode::ALT,
            ModifierKeyCode::LeftSuper | ModifierKeyCode::RightSuper => KeyCode::LEFT_SUPER,
            _ => return None,
        },
        _ => return None,
    })
}

/// Convert crossterm modifiers.
pub fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    let mut modifiers = KeyModifiers::empty();
    modifiers.set(KeyModifiers::SHIFT, mods.contains(event::KeyModifiers::SHIFT));
    modifiers.set(KeyModifiers::CONTROL, mods.contains(event::KeyModifiers::CONTROL));
    modifiers.set(KeyModifiers::ALT, mods.contains(event::KeyModifiers::ALT));
    modifiers.set(KeyModifiers::SUPER, mods.contains(event::KeyModifiers::SUPER));
    modifiers
}

/// Convert a crossterm mouse event. Horizontal scrolling yields `None`.
pub fn convert_mouse(mouse: &event::MouseEvent) -> Option<PointerEvent> {
    let location = Point::new(i32::from(mouse.column), i32::from(mouse.row));
    Some(match mouse.kind {
        MouseEventKind::Down(button) => PointerEvent::down(convert_mouse_button(button), location),
        MouseEventKind::Up(button) => PointerEvent::released(convert_mouse_button(button), location),
        MouseEventKind::Drag(button) => PointerEvent::moved(convert_mouse_button(button), location),
        MouseEventKind::Moved => PointerEvent::moved(MouseButtons::empty(), location),
        MouseEventKind::ScrollUp => PointerEvent::wheel(MouseButtons::empty(), location, WHEEL_DELTA),
        MouseEventKind::ScrollDown => {
            PointerEvent::wheel(MouseButtons::empty(), location, -WHEEL_DELTA)
        }
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
    })
}

/// Convert a crossterm mouse button.
pub const fn convert_mouse_button(button: event::MouseButton) -> MouseButtons {
    match button {
        event::MouseButton::Left => MouseButtons::LEFT,
        event::MouseButton::Right => MouseButtons::RIGHT,
        event::MouseButton::Middle => MouseButtons::MIDDLE,
    }
}
