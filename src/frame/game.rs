//! Application callbacks driven by the frame loop.

use crate::input::Input;

/// Drawing target handed to [`Game::render`] once per tick.
///
/// The frame loop brackets every render with `begin_frame` / `present`.
pub trait RenderSurface {
    /// Prepare for a new frame.
    fn begin_frame(&mut self) {}

    /// Make the frame visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be written out. The loop logs
    /// it and keeps running.
    fn present(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Headless surface: rendering goes nowhere.
impl RenderSurface for () {}

/// Application logic plugged into a [`FrameLoop`](super::FrameLoop).
///
/// `update_logic` and `update_time` run one or more times per tick (the
/// pacing loop repeats them until the frame-rate ceiling is met); `render`
/// runs exactly once per tick afterwards.
pub trait Game {
    /// Surface type this game draws on.
    type Surface: RenderSurface;

    /// Advance game logic. `elapsed` is the previous tick's duration in
    /// seconds.
    fn update_logic(&mut self, input: &Input, elapsed: f64);

    /// Advance game time by `elapsed` seconds.
    fn update_time(&mut self, elapsed: f64);

    /// Draw the current state.
    fn render(&mut self, surface: &mut Self::Surface);

    /// Polled after every tick; returning `true` shuts the engine down.
    fn should_close(&self) -> bool {
        false
    }
}
