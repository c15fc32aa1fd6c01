//! Error types.
//!
//! None of these ever cross a frame boundary: per-event problems are
//! reported as [`InputError`] diagnostics and the event is dropped, while
//! [`EngineError`] is only produced at startup or shutdown.

use thiserror::Error;

/// A queued input event that could not be applied to a state table.
///
/// Returned to nobody: the device logs it and skips the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// Key code outside the keyboard's slot table.
    #[error("unrecognized key code {0:#06x}")]
    UnrecognizedKey(u16),

    /// Button set carrying bits for buttons the pointer does not track.
    #[error("unrecognized pointer buttons {0:#010b}")]
    UnrecognizedButtons(u8),
}

/// Rejected configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Frame-rate ceiling that is zero, negative or NaN.
    #[error("frame rate ceiling must be positive, got {0}")]
    InvalidFrameRateCeiling(f64),

    /// Timer interval of zero.
    #[error("timer interval must be non-zero")]
    ZeroTimerInterval,
}

/// Lifecycle failure of the engine or its host.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Terminal setup or teardown failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration handed to the engine.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The frame timer thread went away while the loop was running.
    #[error("frame timer disconnected")]
    TimerDisconnected,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
