//! The frame loop: input drain, logic, time, then one repaint per tick.
//!
//! Pacing is an active wait. A tick keeps repeating the update steps until
//! the time spent since the tick began brings the instantaneous rate down
//! to the configured ceiling:
//!
//! ```text
//! begin = now
//! do {
//!     keyboard.read_input(); pointer.read_input();
//!     update_logic(last_elapsed); update_time(last_elapsed);
//!     elapsed = now - begin
//! } while 1 / elapsed > max_fps
//! render(); last_elapsed = elapsed
//! ```
//!
//! Update calls receive the duration of the *previous* tick.

use super::clock::{Clock, Stopwatch};
use super::game::{Game, RenderSurface};
use crate::error::ConfigError;
use crate::input::{DrainReport, Input};

/// Offset added to the last tick duration when reporting FPS, so a
/// zero-length tick does not divide by zero.
pub const FPS_EPSILON: f64 = 0.001;

/// Default frame-rate ceiling: no limit.
pub const UNBOUNDED_FPS: f64 = f64::INFINITY;

/// Frames per second implied by a tick duration.
#[inline]
pub fn fps_from_elapsed(elapsed: f64) -> f64 {
    1.0 / (elapsed + FPS_EPSILON)
}

/// Check a frame-rate ceiling.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFrameRateCeiling`] for zero, negative or NaN
/// values.
pub fn validate_ceiling(max_fps: f64) -> Result<f64, ConfigError> {
    if max_fps > 0.0 {
        Ok(max_fps)
    } else {
        Err(ConfigError::InvalidFrameRateCeiling(max_fps))
    }
}

/// Lifecycle of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not ticking. Initial and final state.
    Stopped,
    /// Ticking.
    Running,
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number since the loop was created.
    pub frame: u64,
    /// Update iterations spent pacing this tick.
    pub iterations: u32,
    /// Duration of the tick in seconds.
    pub elapsed: f64,
    /// Input events drained during the tick.
    pub input: DrainReport,
    /// Whether the surface failed to present.
    pub present_failed: bool,
}

/// Frame-paced update loop owning the input devices.
#[derive(Debug)]
pub struct FrameLoop<C = Stopwatch> {
    clock: C,
    input: Input,
    max_fps: f64,
    last_elapsed: f64,
    state: LoopState,
    frames: u64,
}

impl FrameLoop<Stopwatch> {
    /// Create a stopped loop with an unbounded ceiling.
    pub fn new() -> Self {
        Self::with_clock(Stopwatch::new())
    }
}

impl Default for FrameLoop<Stopwatch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameLoop<C> {
    /// Create a stopped loop reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            input: Input::new(),
            max_fps: UNBOUNDED_FPS,
            last_elapsed: 0.0,
            state: LoopState::Stopped,
            frames: 0,
        }
    }

    /// Start ticking. No-op if already running.
    pub fn start(&mut self) {
        if self.state == LoopState::Stopped {
            self.clock.start();
            self.state = LoopState::Running;
            tracing::info!(max_fps = self.max_fps, "frame loop started");
        }
    }

    /// Stop ticking and freeze the clock. No tick runs after this.
    pub fn close(&mut self) {
        if self.state == LoopState::Running {
            self.clock.stop();
            self.state = LoopState::Stopped;
            tracing::info!(frames = self.frames, "frame loop closed");
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the loop is ticking.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run one tick. Returns `None` when the loop is stopped.
    pub fn tick<G: Game>(&mut self, game: &mut G, surface: &mut G::Surface) -> Option<TickReport> {
        if self.state != LoopState::Running {
            return None;
        }

        let begin = self.clock.now();
        let mut iterations = 0u32;
        let mut input = DrainReport::default();
        let elapsed = loop {
            let drained = self.input.read_input();
            input.applied += drained.applied;
            input.rejected += drained.rejected;

            game.update_logic(&self.input, self.last_elapsed);
            game.update_time(self.last_elapsed);
            iterations = iterations.saturating_add(1);

            let elapsed = self.clock.now() - begin;
            if 1.0 / elapsed <= self.max_fps {
                break elapsed;
            }
        };

        surface.begin_frame();
        game.render(surface);
        let present_failed = match surface.present() {
            Ok(()) => false,
            Err(err) => {
                tracing::warn!(error = %err, frame = self.frames, "failed to present frame");
                true
            }
        };

        self.last_elapsed = elapsed;
        let report = TickReport {
            frame: self.frames,
            iterations,
            elapsed,
            input,
            present_failed,
        };
        self.frames += 1;
        tracing::trace!(?report, "tick");
        Some(report)
    }

    /// Instantaneous rate derived from the last tick.
    #[inline]
    pub fn current_fps(&self) -> f64 {
        fps_from_elapsed(self.last_elapsed)
    }

    /// Duration of the last tick in seconds.
    #[inline]
    pub const fn last_elapsed(&self) -> f64 {
        self.last_elapsed
    }

    /// Set the frame-rate ceiling; applies from the next tick.
    ///
    /// # Errors
    ///
    /// Rejects zero, negative or NaN ceilings and keeps the previous value.
    pub fn set_frame_rate_ceiling(&mut self, max_fps: f64) -> Result<(), ConfigError> {
        self.max_fps = validate_ceiling(max_fps)?;
        tracing::debug!(max_fps, "frame rate ceiling changed");
        Ok(())
    }

    /// Current frame-rate ceiling.
    #[inline]
    pub const fn frame_rate_ceiling(&self) -> f64 {
        self.max_fps
    }

    /// Ticks completed so far.
    #[inline]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// The input devices.
    #[inline]
    pub const fn input(&self) -> &Input {
        &self.input
    }

    /// Mutable access to the input devices (focus handling, resets).
    #[inline]
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// The clock.
    #[inline]
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}
