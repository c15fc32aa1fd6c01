//! Keyboard device: one tri-state slot per virtual key code.

use super::queue::{EventQueue, EventSender};
use super::state::{ButtonState, DrainReport, StateTable};
use crate::error::InputError;
use bitflags::bitflags;

/// Number of key slots; codes at or above this are unrecognized.
pub const KEY_SLOT_COUNT: usize = 256;

/// Virtual key code.
///
/// Values follow the common desktop virtual-key numbering (letters and
/// digits map to their uppercase ASCII values). Hosts with a different
/// native numbering translate before pushing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

#[allow(missing_docs)]
impl KeyCode {
    pub const NONE: Self = Self(0x00);
    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const ENTER: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const ALT: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const CAPS_LOCK: Self = Self(0x14);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PAGE_UP: Self = Self(0x21);
    pub const PAGE_DOWN: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const INSERT: Self = Self(0x2D);
    pub const DELETE: Self = Self(0x2E);
    pub const D0: Self = Self(0x30);
    pub const A: Self = Self(0x41);
    pub const D: Self = Self(0x44);
    pub const Q: Self = Self(0x51);
    pub const S: Self = Self(0x53);
    pub const W: Self = Self(0x57);
    pub const LEFT_SUPER: Self = Self(0x5B);
    pub const F1: Self = Self(0x70);
    pub const NUM_LOCK: Self = Self(0x90);
    pub const SCROLL_LOCK: Self = Self(0x91);
}

impl KeyCode {
    /// Key code for an ASCII letter or digit, case-insensitive.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Some(Self(c as u16 - 0x20)),
            'A'..='Z' | '0'..='9' => Some(Self(c as u16)),
            _ => None,
        }
    }

    /// Function key `F{n}` for `n` in `1..=24`.
    pub const fn function(n: u8) -> Option<Self> {
        match n {
            1..=24 => Some(Self(Self::F1.0 + n as u16 - 1)),
            _ => None,
        }
    }

    /// Slot index, if the code fits the key table.
    #[inline]
    pub const fn slot(self) -> Option<usize> {
        let index = self.0 as usize;
        if index < KEY_SLOT_COUNT {
            Some(index)
        } else {
            None
        }
    }
}

bitflags! {
    /// Modifier keys held when a key event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        /// Shift key held
        const SHIFT = 0b0000_0001;
        /// Control key held
        const CONTROL = 0b0000_0010;
        /// Alt/Option key held
        const ALT = 0b0000_0100;
        /// Super/Command/Windows key held
        const SUPER = 0b0000_1000;
    }
}

bitflags! {
    /// Toggle keys that were on when a key event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LockKeys: u8 {
        /// Caps Lock on
        const CAPS_LOCK = 0b0000_0001;
        /// Num Lock on
        const NUM_LOCK = 0b0000_0010;
        /// Scroll Lock on
        const SCROLL_LOCK = 0b0000_0100;
    }
}

/// Direction of a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// Key went down.
    Down,
    /// Key came up.
    Released,
}

/// Raw key notification as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Virtual key code.
    pub code: KeyCode,
    /// Modifiers held at the time.
    pub modifiers: KeyModifiers,
    /// Lock keys on at the time. Empty if the host does not know.
    pub locks: LockKeys,
    /// Down or released.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Key-down notification.
    #[inline]
    pub const fn down(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers,
            locks: LockKeys::empty(),
            kind: KeyEventKind::Down,
        }
    }

    /// Key-up notification.
    #[inline]
    pub const fn released(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers,
            locks: LockKeys::empty(),
            kind: KeyEventKind::Released,
        }
    }

    /// Attach the lock-key state reported by the host.
    #[inline]
    #[must_use]
    pub const fn with_locks(mut self, locks: LockKeys) -> Self {
        self.locks = locks;
        self
    }
}

/// Frame-synchronous keyboard state.
///
/// Host threads push [`KeyEvent`]s through [`Keyboard::sender`]; the frame
/// loop calls [`Keyboard::read_input`] once per iteration and logic queries
/// the resulting state.
#[derive(Debug)]
pub struct Keyboard {
    keys: StateTable<KEY_SLOT_COUNT>,
    events: EventQueue<KeyEvent>,
    modifiers: KeyModifiers,
    locks: LockKeys,
}

impl Keyboard {
    /// Create a keyboard with every key at [`ButtonState::None`].
    pub fn new() -> Self {
        Self {
            keys: StateTable::new(),
            events: EventQueue::new(),
            modifiers: KeyModifiers::empty(),
            locks: LockKeys::empty(),
        }
    }

    /// Queue a raw event for the next drain. Returns `false` on overflow.
    pub fn queue_event(&self, event: KeyEvent) -> bool {
        self.events.push(event)
    }

    /// Producer handle for host threads.
    pub fn sender(&self) -> EventSender<KeyEvent> {
        self.events.sender()
    }

    /// Decay last frame's release pulses, then apply every queued event in
    /// arrival order.
    pub fn read_input(&mut self) -> DrainReport {
        self.keys.decay_released();

        let mut report = DrainReport::default();
        for event in self.events.drain_all() {
            match self.apply(event) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring keyboard event");
                    report.rejected += 1;
                }
            }
        }
        report
    }

    fn apply(&mut self, event: KeyEvent) -> Result<(), InputError> {
        let slot = event.code.slot().ok_or(InputError::UnrecognizedKey(event.code.0))?;
        let state = match event.kind {
            KeyEventKind::Down => ButtonState::Down,
            KeyEventKind::Released => ButtonState::Released,
        };
        self.keys.set(slot, state);
        self.modifiers = event.modifiers;
        self.locks = event.locks;
        Ok(())
    }

    /// Current state of `code`; unrecognized codes read as `None`.
    #[inline]
    pub fn state(&self, code: KeyCode) -> ButtonState {
        code.slot()
            .and_then(|slot| self.keys.get(slot))
            .unwrap_or_default()
    }

    /// Whether `code` is held down.
    #[inline]
    pub fn is_down(&self, code: KeyCode) -> bool {
        self.state(code).is_down()
    }

    /// Whether `code` was released during the last drain.
    #[inline]
    pub fn is_released(&self, code: KeyCode) -> bool {
        self.state(code).is_released()
    }

    /// Modifier set carried by the most recently applied event.
    #[inline]
    pub const fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Lock-key state carried by the most recently applied event.
    #[inline]
    pub const fn locks(&self) -> LockKeys {
        self.locks
    }

    /// Whether Caps Lock is on.
    #[inline]
    pub const fn caps_lock(&self) -> bool {
        self.locks.contains(LockKeys::CAPS_LOCK)
    }

    /// Whether Num Lock is on.
    #[inline]
    pub const fn num_lock(&self) -> bool {
        self.locks.contains(LockKeys::NUM_LOCK)
    }

    /// Whether Scroll Lock is on.
    #[inline]
    pub const fn scroll_lock(&self) -> bool {
        self.locks.contains(LockKeys::SCROLL_LOCK)
    }

    /// Keys currently held down.
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys
            .active()
            .filter(|(_, state)| state.is_down())
            .filter_map(|(index, _)| u16::try_from(index).ok().map(KeyCode))
    }

    /// Discard queued events that have not been drained yet.
    pub fn clear_events_buffer(&self) -> usize {
        self.events.clear()
    }

    /// Force every key to [`ButtonState::None`].
    pub fn reset(&mut self) {
        self.keys.reset();
        self.modifiers = KeyModifiers::empty();
        self.locks = LockKeys::empty();
    }

    /// Number of events waiting for the next drain.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EVENT_QUEUE_CAPACITY;

    const A: KeyCode = KeyCode::A;

    fn down(code: KeyCode) -> KeyEvent {
        KeyEvent::down(code, KeyModifiers::empty())
    }

    fn up(code: KeyCode) -> KeyEvent {
        KeyEvent::released(code, KeyModifiers::empty())
    }

    #[test]
    fn test_press_release_cycle() {
        let mut keyboard = Keyboard::new();

        keyboard.queue_event(down(A));
        keyboard.read_input();
        assert!(keyboard.is_down(A));
        assert!(!keyboard.is_released(A));

        keyboard.queue_event(up(A));
        keyboard.read_input();
        assert!(!keyboard.is_down(A));
        assert!(keyboard.is_released(A));

        keyboard.read_input();
        assert_eq!(keyboard.state(A), ButtonState::None);
    }

    #[test]
    fn test_down_then_release_in_one_batch() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(down(A));
        keyboard.queue_event(up(A));

        let report = keyboard.read_input();
        assert_eq!(report.applied, 2);
        assert_eq!(keyboard.state(A), ButtonState::Released);

        keyboard.read_input();
        assert_eq!(keyboard.state(A), ButtonState::None);
    }

    #[test]
    fn test_held_key_survives_empty_drains() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(down(KeyCode::SPACE));
        for _ in 0..5 {
            keyboard.read_input();
            assert!(keyboard.is_down(KeyCode::SPACE));
        }
    }

    #[test]
    fn test_release_decays_before_new_events() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(down(A));
        keyboard.queue_event(up(A));
        keyboard.read_input();

        // Re-press in the next frame: decay runs first, then Down applies.
        keyboard.queue_event(down(A));
        keyboard.read_input();
        assert_eq!(keyboard.state(A), ButtonState::Down);
    }

    #[test]
    fn test_unrecognized_code_is_ignored() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(down(KeyCode(0x8000)));
        keyboard.queue_event(down(A));

        let report = keyboard.read_input();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.applied, 1);
        assert!(keyboard.is_down(A));
        assert_eq!(keyboard.state(KeyCode(0x8000)), ButtonState::None);
    }

    #[test]
    fn test_overflow_applies_capacity_events() {
        let mut keyboard = Keyboard::new();
        let sender = keyboard.sender();
        let mut accepted = 0;
        for i in 0..=EVENT_QUEUE_CAPACITY {
            let code = KeyCode(u16::try_from(i % KEY_SLOT_COUNT).unwrap());
            if sender.push(down(code)) {
                accepted += 1;
            } else {
                assert_eq!(i, EVENT_QUEUE_CAPACITY);
            }
        }
        assert_eq!(accepted, 255);

        let report = keyboard.read_input();
        assert_eq!(report.drained(), 255);
        assert_eq!(keyboard.pressed_keys().count(), 255);
    }

    #[test]
    fn test_clear_events_buffer_discards_pending() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(down(A));
        keyboard.read_input();

        keyboard.queue_event(up(A));
        assert_eq!(keyboard.clear_events_buffer(), 1);
        keyboard.read_input();

        assert!(keyboard.is_down(A));
    }

    #[test]
    fn test_modifiers_track_last_event() {
        let mut keyboard = Keyboard::new();
        keyboard.queue_event(KeyEvent::down(A, KeyModifiers::SHIFT | KeyModifiers::CONTROL));
        keyboard.read_input();
        assert!(keyboard.modifiers().contains(KeyModifiers::CONTROL));

        keyboard.reset();
        assert!(keyboard.modifiers().is_empty());
        assert!(!keyboard.is_down(A));
    }

    #[test]
    fn test_lock_state_follows_last_event() {
        let mut keyboard = Keyboard::new();
        assert!(!keyboard.caps_lock());

        keyboard.queue_event(down(A).with_locks(LockKeys::CAPS_LOCK | LockKeys::NUM_LOCK));
        keyboard.read_input();
        assert!(keyboard.caps_lock());
        assert!(keyboard.num_lock());
        assert!(!keyboard.scroll_lock());

        keyboard.queue_event(up(KeyCode::CAPS_LOCK).with_locks(LockKeys::NUM_LOCK));
        keyboard.read_input();
        assert!(!keyboard.caps_lock());
        assert!(keyboard.num_lock());

        // Rejected events leave the lock state alone.
        keyboard.queue_event(down(KeyCode(0x8000)).with_locks(LockKeys::SCROLL_LOCK));
        keyboard.read_input();
        assert!(!keyboard.scroll_lock());

        keyboard.reset();
        assert_eq!(keyboard.locks(), LockKeys::empty());
    }

    #[test]
    fn test_key_code_helpers() {
        assert_eq!(KeyCode::from_char('a'), Some(KeyCode::A));
        assert_eq!(KeyCode::from_char('0'), Some(KeyCode::D0));
        assert_eq!(KeyCode::from_char('!'), None);
        assert_eq!(KeyCode::function(1), Some(KeyCode::F1));
        assert_eq!(KeyCode::function(0), None);
        assert_eq!(KeyCode(255).slot(), Some(255));
        assert_eq!(KeyCode(256).slot(), None);
    }
}
