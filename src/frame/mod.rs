//! Frame pacing: clock, application callbacks and the tick loop.

mod clock;
mod game;
mod pacer;

pub use clock::{Clock, Stopwatch};
pub use game::{Game, RenderSurface};
pub use pacer::{
    fps_from_elapsed, validate_ceiling, FrameLoop, LoopState, TickReport, FPS_EPSILON, UNBOUNDED_FPS,
};
