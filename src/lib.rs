//! # Pulseloop
//!
//! A frame-paced update loop with frame-synchronous keyboard and pointer
//! input.
//!
//! Input notifications arrive from host threads at whatever rate the host
//! produces them. Pulseloop buffers them in bounded queues and applies them
//! once per loop iteration, so game logic always sees a coherent snapshot:
//! a key is `Down` while held and `Released` for exactly one frame after it
//! comes up.
//!
//! ## Core Concepts
//!
//! - **Bounded event queues**: lock-free, never block the host, drop on overflow
//! - **Tri-state latches**: `None` / `Down` / one-frame `Released` pulse
//! - **Busy-wait pacing**: update steps repeat until the FPS ceiling holds
//! - **Actor model**: timer and input threads feed the loop through channels
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulseloop::{Engine, EngineConfig, Game, Input, KeyCode};
//!
//! struct Spin {
//!     angle: f64,
//!     quit: bool,
//! }
//!
//! impl Game for Spin {
//!     type Surface = ();
//!
//!     fn update_logic(&mut self, input: &Input, elapsed: f64) {
//!         self.angle += elapsed;
//!         self.quit |= input.keyboard.is_released(KeyCode::ESCAPE);
//!     }
//!
//!     fn update_time(&mut self, _elapsed: f64) {}
//!
//!     fn render(&mut self, _surface: &mut ()) {}
//!
//!     fn should_close(&self) -> bool {
//!         self.quit
//!     }
//! }
//!
//! let config = EngineConfig::default().with_max_fps(60.0);
//! let mut engine = Engine::with_config(Spin { angle: 0.0, quit: false }, config)?;
//! let host = engine.host_handle(); // hand this to the thread delivering input
//! engine.run(&mut ())?;
//! # drop(host);
//! # Ok::<(), pulseloop::EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod error;
pub mod frame;
pub mod input;
pub mod terminal;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, FrameTimer, HostHandle, HostSignal, TerminalInput};
pub use error::{ConfigError, EngineError, InputError};
pub use frame::{Clock, FrameLoop, Game, LoopState, RenderSurface, Stopwatch, TickReport};
pub use input::{
    ButtonState, Input, InputHandle, KeyCode, KeyEvent, KeyModifiers, Keyboard, LockKeys,
    MouseButton, MouseButtons, Point, Pointer, PointerEvent, WHEEL_DELTA,
};
pub use terminal::{Rgb, TerminalConfig, TerminalSession, TerminalSurface};
