//! Frame-synchronous input: bounded event queues feeding tri-state tables.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  push (any thread)  ┌────────────┐
//! │ Host thread  │ ──────────────────▶ │ EventQueue │  (255 events max)
//! └──────────────┘                     └─────┬──────┘
//!                                            │ read_input (loop thread,
//!                                            ▼  once per iteration)
//!                                      ┌────────────┐
//!                                      │ StateTable │ None/Down/Released
//!                                      └─────┬──────┘
//!                                            │ is_down / is_released
//!                                            ▼
//!                                        game logic
//! ```
//!
//! Only the queues cross threads. State tables are owned by the loop thread,
//! so queries never race with event delivery.

mod handle;
mod keyboard;
mod pointer;
mod queue;
mod state;

pub use handle::{Input, InputHandle};
pub use keyboard::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, Keyboard, LockKeys, KEY_SLOT_COUNT,
};
pub use pointer::{
    MouseButton, MouseButtons, Point, Pointer, PointerEvent, PointerEventKind, BUTTON_SLOT_COUNT,
    WHEEL_DELTA,
};
pub use queue::{EventQueue, EventSender, EVENT_QUEUE_CAPACITY};
pub use state::{ButtonState, DrainReport, StateTable};
