//! Actor Model: threads around the frame loop.
//!
//! - **Frame Timer**: emits tick signals at a nominal interval
//! - **Terminal Input**: polls crossterm, pushes raw input into the queues
//! - **Engine**: runs the frame loop on the caller's thread
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  KeyEvent/PointerEvent  ┌──────────────┐
//! │ Input Thread │ ──────────────────────▶ │ input queues │
//! └──────┬───────┘                         └──────┬───────┘
//!        │ HostSignal                             │ read_input
//!        ▼                                        ▼
//! ┌──────────────┐                         ┌──────────────┐
//! │   signals    │ ──────────────────────▶ │    Engine    │ ── render ─▶ surface
//! └──────────────┘                         └──────────────┘
//!                                                 ▲
//! ┌──────────────┐           Tick                 │
//! │ Timer Thread │ ───────────────────────────────┘
//! └──────────────┘
//! ```

mod engine;
mod input;
mod messages;
mod timer;

pub use engine::{Engine, EngineConfig};
pub use input::{
    convert_key, convert_key_code, convert_locks, convert_modifiers, convert_mouse,
    convert_mouse_button, dispatch, TerminalInput,
};
pub use messages::{HostHandle, HostSignal};
pub use timer::{FrameTimer, Tick};
