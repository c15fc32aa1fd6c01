//! Terminal host: session setup and the drawing surface.

mod session;
mod surface;

pub use session::{TerminalConfig, TerminalSession};
pub use surface::{Rgb, TerminalSurface};
