//! Tri-state slot tables backing both input devices.
//!
//! ```text
//!            Down event             Released event
//!   None ───────────────▶ Down ─────────────────────▶ Released
//!    ▲                                                   │
//!    └───────────── decay (start of next drain) ─────────┘
//! ```
//!
//! A Down followed by a Released inside the same drain leaves the slot
//! Released: the press is only ever seen as a release pulse.

/// State of one key or button as seen by frame logic.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    /// Not held, not released this frame.
    #[default]
    None = 0,
    /// Held down.
    Down = 1,
    /// Released during the last drain; visible for exactly one frame.
    Released = 2,
}

impl ButtonState {
    /// Whether the slot is held down.
    #[inline]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }

    /// Whether the slot carries a release pulse.
    #[inline]
    pub const fn is_released(self) -> bool {
        matches!(self, Self::Released)
    }

    /// State after the pre-drain edge reset.
    #[inline]
    pub const fn decay(self) -> Self {
        match self {
            Self::Released => Self::None,
            other => other,
        }
    }
}

/// Fixed-size table of [`ButtonState`] slots, indexed by device code.
///
/// Created once per device and never resized.
#[derive(Clone, PartialEq, Eq)]
pub struct StateTable<const N: usize> {
    slots: [ButtonState; N],
}

impl<const N: usize> StateTable<N> {
    /// Table with every slot at [`ButtonState::None`].
    pub const fn new() -> Self {
        Self {
            slots: [ButtonState::None; N],
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the table has no slots.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// State of the slot at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<ButtonState> {
        self.slots.get(index).copied()
    }

    /// Overwrite the slot at `index`. Returns `false` if out of range.
    #[inline]
    pub fn set(&mut self, index: usize, state: ButtonState) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Apply [`ButtonState::decay`] to every slot.
    pub fn decay_released(&mut self) {
        for slot in &mut self.slots {
            *slot = slot.decay();
        }
    }

    /// Force every slot to [`ButtonState::None`].
    pub fn reset(&mut self) {
        self.slots = [ButtonState::None; N];
    }

    /// Iterate `(index, state)` for slots that are not `None`.
    pub fn active(&self) -> impl Iterator<Item = (usize, ButtonState)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, state)| **state != ButtonState::None)
            .map(|(index, state)| (index, *state))
    }
}

impl<const N: usize> Default for StateTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> std::fmt::Debug for StateTable<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.active()).finish()
    }
}

/// Outcome of one device drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Events applied to the state table.
    pub applied: usize,
    /// Events ignored as unrecognized.
    pub rejected: usize,
}

impl DrainReport {
    /// Total number of events taken off the queue.
    #[inline]
    pub const fn drained(&self) -> usize {
        self.applied + self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_only_touches_released() {
        assert_eq!(ButtonState::Released.decay(), ButtonState::None);
        assert_eq!(ButtonState::Down.decay(), ButtonState::Down);
        assert_eq!(ButtonState::None.decay(), ButtonState::None);
    }

    #[test]
    fn test_table_bounds() {
        let mut table = StateTable::<4>::new();
        assert!(table.set(3, ButtonState::Down));
        assert!(!table.set(4, ButtonState::Down));
        assert_eq!(table.get(3), Some(ButtonState::Down));
        assert_eq!(table.get(4), None);
    }

    #[test]
    fn test_decay_and_reset() {
        let mut table = StateTable::<3>::new();
        table.set(0, ButtonState::Down);
        table.set(1, ButtonState::Released);

        table.decay_released();
        assert_eq!(table.get(0), Some(ButtonState::Down));
        assert_eq!(table.get(1), Some(ButtonState::None));
        assert_eq!(table.active().count(), 1);

        table.reset();
        assert_eq!(table.active().count(), 0);
    }
}
