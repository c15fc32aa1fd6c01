//! Pointer device: button slots plus location, wheel and hover state.

use super::queue::{EventQueue, EventSender};
use super::state::{ButtonState, DrainReport, StateTable};
use crate::error::InputError;
use bitflags::bitflags;

/// Wheel delta reported for one detent of a standard mouse wheel.
pub const WHEEL_DELTA: i32 = 120;

/// Number of tracked pointer buttons.
pub const BUTTON_SLOT_COUNT: usize = 5;

/// Integer position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A single pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button / wheel click.
    Middle,
    /// First extra button (usually "back").
    X1,
    /// Second extra button (usually "forward").
    X2,
}

impl MouseButton {
    /// Every tracked button, in slot order.
    pub const ALL: [Self; BUTTON_SLOT_COUNT] = [Self::Left, Self::Right, Self::Middle, Self::X1, Self::X2];

    /// Slot index of this button.
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Set of pointer buttons carried by a raw event.
    ///
    /// Bits outside the named flags are kept so that unknown buttons can be
    /// reported instead of silently folded away.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Primary button
        const LEFT = 0b0000_0001;
        /// Secondary button
        const RIGHT = 0b0000_0010;
        /// Middle button
        const MIDDLE = 0b0000_0100;
        /// First extra button
        const X1 = 0b0000_1000;
        /// Second extra button
        const X2 = 0b0001_0000;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::X1 => Self::X1,
            MouseButton::X2 => Self::X2,
        }
    }
}

impl MouseButtons {
    /// Iterate the tracked buttons present in this set.
    pub fn buttons(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(move |button| self.contains(MouseButtons::from(*button)))
    }
}

/// Kind of raw pointer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button(s) pressed.
    Down,
    /// Button(s) released.
    Released,
    /// Pointer entered the surface.
    Enter,
    /// Pointer left the surface.
    Leave,
    /// Pointer moved.
    Move,
    /// Wheel turned.
    Wheel,
    /// Pointer capture changed. Accepted and ignored.
    Capture,
    /// Placeholder notification. Accepted and ignored.
    None,
}

/// Raw pointer notification as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Buttons involved (or held, for non-button events).
    pub buttons: MouseButtons,
    /// Pointer position at the time.
    pub location: Point,
    /// Wheel delta, zero for anything but [`PointerEventKind::Wheel`].
    pub delta: i32,
}

impl PointerEvent {
    /// Generic constructor with a zero wheel delta.
    #[inline]
    pub const fn new(kind: PointerEventKind, buttons: MouseButtons, location: Point) -> Self {
        Self {
            kind,
            buttons,
            location,
            delta: 0,
        }
    }

    /// Button press.
    #[inline]
    pub const fn down(buttons: MouseButtons, location: Point) -> Self {
        Self::new(PointerEventKind::Down, buttons, location)
    }

    /// Button release.
    #[inline]
    pub const fn released(buttons: MouseButtons, location: Point) -> Self {
        Self::new(PointerEventKind::Released, buttons, location)
    }

    /// Pointer motion.
    #[inline]
    pub const fn moved(buttons: MouseButtons, location: Point) -> Self {
        Self::new(PointerEventKind::Move, buttons, location)
    }

    /// Pointer entered the surface.
    #[inline]
    pub const fn enter(buttons: MouseButtons) -> Self {
        Self::new(PointerEventKind::Enter, buttons, Point::ZERO)
    }

    /// Pointer left the surface.
    #[inline]
    pub const fn leave(buttons: MouseButtons) -> Self {
        Self::new(PointerEventKind::Leave, buttons, Point::ZERO)
    }

    /// Wheel rotation by `delta` (multiples of [`WHEEL_DELTA`] per detent).
    #[inline]
    pub const fn wheel(buttons: MouseButtons, location: Point, delta: i32) -> Self {
        Self {
            kind: PointerEventKind::Wheel,
            buttons,
            location,
            delta,
        }
    }
}

/// Frame-synchronous pointer state.
#[derive(Debug)]
pub struct Pointer {
    buttons: StateTable<BUTTON_SLOT_COUNT>,
    events: EventQueue<PointerEvent>,
    location: Point,
    delta: i32,
    over_window: bool,
    has_focus: bool,
}

impl Pointer {
    /// Create a pointer with no buttons held, at the origin, without focus.
    pub fn new() -> Self {
        Self {
            buttons: StateTable::new(),
            events: EventQueue::new(),
            location: Point::ZERO,
            delta: 0,
            over_window: false,
            has_focus: false,
        }
    }

    /// Queue a raw event for the next drain. Returns `false` on overflow.
    pub fn queue_event(&self, event: PointerEvent) -> bool {
        self.events.push(event)
    }

    /// Producer handle for host threads.
    pub fn sender(&self) -> EventSender<PointerEvent> {
        self.events.sender()
    }

    /// Decay release pulses and the wheel delta, then apply every queued
    /// event in arrival order.
    pub fn read_input(&mut self) -> DrainReport {
        self.buttons.decay_released();
        self.delta = 0;

        let mut report = DrainReport::default();
        for event in self.events.drain_all() {
            match self.apply(event) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!(error = %err, kind = ?event.kind, "ignoring pointer event");
                    report.rejected += 1;
                }
            }
        }
        report
    }

    fn apply(&mut self, event: PointerEvent) -> Result<(), InputError> {
        match event.kind {
            PointerEventKind::Down => self.set_buttons(event.buttons, ButtonState::Down)?,
            PointerEventKind::Released => self.set_buttons(event.buttons, ButtonState::Released)?,
            PointerEventKind::Move => self.location = event.location,
            PointerEventKind::Enter => self.over_window = true,
            PointerEventKind::Leave => self.over_window = false,
            PointerEventKind::Wheel => {
                self.location = event.location;
                self.delta = event.delta;
            }
            PointerEventKind::Capture | PointerEventKind::None => {}
        }
        Ok(())
    }

    fn set_buttons(&mut self, buttons: MouseButtons, state: ButtonState) -> Result<(), InputError> {
        if !MouseButtons::all().contains(buttons) {
            return Err(InputError::UnrecognizedButtons(buttons.bits()));
        }
        for button in buttons.buttons() {
            self.buttons.set(button.slot(), state);
        }
        Ok(())
    }

    /// Current state of `button`.
    #[inline]
    pub fn state(&self, button: MouseButton) -> ButtonState {
        self.buttons.get(button.slot()).unwrap_or_default()
    }

    /// Whether `button` is held down.
    #[inline]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.state(button).is_down()
    }

    /// Whether `button` was released during the last drain.
    #[inline]
    pub fn is_released(&self, button: MouseButton) -> bool {
        self.state(button).is_released()
    }

    /// Last known pointer position.
    #[inline]
    pub const fn location(&self) -> Point {
        self.location
    }

    /// Wheel delta of the last drain; zero if no wheel event arrived.
    #[inline]
    pub const fn delta(&self) -> i32 {
        self.delta
    }

    /// Whether the pointer is over the surface.
    #[inline]
    pub const fn over_window(&self) -> bool {
        self.over_window
    }

    /// Whether the surface has input focus.
    #[inline]
    pub const fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Record a focus change reported by the host.
    pub fn set_focus(&mut self, focused: bool) {
        if self.has_focus != focused {
            tracing::debug!(focused, "pointer focus changed");
        }
        self.has_focus = focused;
    }

    /// Discard queued events that have not been drained yet.
    pub fn clear_events_buffer(&self) -> usize {
        self.events.clear()
    }

    /// Force every button to [`ButtonState::None`].
    pub fn reset(&mut self) {
        self.buttons.reset();
    }

    /// Number of events waiting for the next drain.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new()
    }
}
