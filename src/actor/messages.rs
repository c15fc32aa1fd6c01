//! Message types between host threads and the engine.

use crate::input::{InputHandle, KeyEvent, PointerEvent};
use crossbeam_channel::Sender;

/// Window-level notifications that are not device input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// The surface gained input focus.
    FocusGained,
    /// The surface lost input focus: pending input is discarded.
    FocusLost,
    /// The host is closing; the engine stops after the current tick.
    Close,
}

/// Everything a host thread needs to feed the engine.
///
/// Cloneable and `Send`; none of its methods block.
#[derive(Debug, Clone)]
pub struct HostHandle {
    input: InputHandle,
    signals: Sender<HostSignal>,
}

impl HostHandle {
    pub(crate) const fn new(input: InputHandle, signals: Sender<HostSignal>) -> Self {
        Self { input, signals }
    }

    /// Queue a key event. Returns `false` if it was dropped.
    #[inline]
    pub fn push_key(&self, event: KeyEvent) -> bool {
        self.input.push_key(event)
    }

    /// Queue a pointer event. Returns `false` if it was dropped.
    #[inline]
    pub fn push_pointer(&self, event: PointerEvent) -> bool {
        self.input.push_pointer(event)
    }

    /// Deliver a host signal. Returns `false` if the engine is gone.
    ///
    /// [`HostSignal::FocusLost`] discards undrained input immediately, so
    /// events pushed after this call survive. The loop then releases pointer
    /// buttons and clears the focus flag before its next tick.
    pub fn signal(&self, signal: HostSignal) -> bool {
        if signal == HostSignal::FocusLost {
            let dropped = self.input.clear_pending();
            tracing::debug!(dropped, "focus lost, pending input discarded");
        }
        self.signals.send(signal).is_ok()
    }

    /// Shorthand for [`HostSignal::FocusGained`].
    pub fn focus_gained(&self) -> bool {
        self.signal(HostSignal::FocusGained)
    }

    /// Shorthand for [`HostSignal::FocusLost`].
    pub fn focus_lost(&self) -> bool {
        self.signal(HostSignal::FocusLost)
    }

    /// Shorthand for [`HostSignal::Close`].
    pub fn close(&self) -> bool {
        self.signal(HostSignal::Close)
    }

    /// The raw input handle.
    #[inline]
    pub const fn input(&self) -> &InputHandle {
        &self.input
    }
}
