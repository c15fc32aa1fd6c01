//! Spinner demo: a rotating line drawn in the terminal.
//!
//! - Hold Left/Right to change the spin speed (needs a terminal that
//!   reports key releases; otherwise each press nudges the speed once)
//! - Scroll the mouse wheel to change the line length
//! - Click to reverse direction
//! - Esc, Q or Ctrl+C to quit

use pulseloop::frame::fps_from_elapsed;
use pulseloop::{
    Engine, EngineConfig, Game, Input, KeyCode, MouseButton, Rgb, TerminalConfig, TerminalInput,
    TerminalSession, TerminalSurface, WHEEL_DELTA,
};

struct Spinner {
    angle: f64,
    speed: f64,
    length: f64,
    fps: f64,
    pointer: (i32, i32),
    quit: bool,
}

impl Game for Spinner {
    type Surface = TerminalSurface;

    fn update_logic(&mut self, input: &Input, elapsed: f64) {
        let keys = &input.keyboard;
        if keys.is_down(KeyCode::RIGHT) || keys.is_released(KeyCode::RIGHT) {
            self.speed += 0.05;
        }
        if keys.is_down(KeyCode::LEFT) || keys.is_released(KeyCode::LEFT) {
            self.speed -= 0.05;
        }
        if input.pointer.is_released(MouseButton::Left) {
            self.speed = -self.speed;
        }
        let notches = f64::from(input.pointer.delta() / WHEEL_DELTA);
        self.length = (self.length + notches).clamp(2.0, 40.0);

        let location = input.pointer.location();
        self.pointer = (location.x, location.y);
        self.quit |= keys.is_released(KeyCode::ESCAPE) || keys.is_released(KeyCode::Q);
        self.fps = fps_from_elapsed(elapsed);
    }

    fn update_time(&mut self, elapsed: f64) {
        self.angle += self.speed * elapsed;
    }

    fn render(&mut self, surface: &mut TerminalSurface) {
        let cx = f64::from(surface.width()) / 2.0;
        let cy = f64::from(surface.height()) / 2.0;
        let (sin, cos) = self.angle.sin_cos();

        surface.set_fg(Rgb::from_u32(0xFF3030));
        let steps = (self.length * 2.0) as u16;
        for step in 0..=steps {
            let t = f64::from(step) / 2.0;
            // Cells are roughly twice as tall as wide.
            let x = cx + cos * t * 2.0;
            let y = cy + sin * t;
            if x >= 0.0 && y >= 0.0 {
                surface.draw_text(x as u16, y as u16, "*");
            }
        }

        surface.set_fg(Rgb::from_u32(0xC0C0C0));
        let status = format!(
            "The Spinner - FPS: {:.0}  speed: {:.2}  pointer: {:?}  (Esc to quit)",
            self.fps, self.speed, self.pointer
        );
        surface.draw_text(0, 0, &status);
    }

    fn should_close(&self) -> bool {
        self.quit
    }
}

fn main() -> Result<(), pulseloop::EngineError> {
    let session = TerminalSession::enter(TerminalConfig::default())?;
    let (width, height) = session.size();

    let game = Spinner {
        angle: 0.0,
        speed: 1.0,
        length: 10.0,
        fps: 0.0,
        pointer: (0, 0),
        quit: false,
    };
    let config = EngineConfig::default().with_max_fps(60.0);
    let mut engine = Engine::with_config(game, config)?;
    let input = TerminalInput::spawn(engine.host_handle(), &session)?;

    let mut surface = TerminalSurface::stdout(width, height);
    let result = engine.run(&mut surface);

    input.join();
    drop(session);
    result
}
