//! Headless demo: a producer thread hammers the input queues while the
//! engine runs at a 60 FPS ceiling.
//!
//! Run with `RUST_LOG=pulseloop=debug` to see lifecycle and focus logs.

use pulseloop::{
    Engine, EngineConfig, Game, Input, KeyCode, KeyEvent, KeyModifiers, MouseButtons, Point,
    PointerEvent, WHEEL_DELTA,
};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRAMES: u64 = 120;

#[derive(Default)]
struct Stats {
    frames: u64,
    updates: u64,
    presses: u64,
    wheel: i64,
    game_time: f64,
}

impl Game for Stats {
    type Surface = ();

    fn update_logic(&mut self, input: &Input, _elapsed: f64) {
        self.updates += 1;
        if input.keyboard.is_released(KeyCode::SPACE) {
            self.presses += 1;
        }
        self.wheel += i64::from(input.pointer.delta());
    }

    fn update_time(&mut self, elapsed: f64) {
        self.game_time += elapsed;
    }

    fn render(&mut self, _surface: &mut ()) {
        self.frames += 1;
    }

    fn should_close(&self) -> bool {
        self.frames >= FRAMES
    }
}

fn main() -> Result<(), pulseloop::EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::default().with_max_fps(60.0);
    let mut engine = Engine::with_config(Stats::default(), config)?;
    let host = engine.host_handle();

    let producer = thread::spawn(move || {
        let mut sent = 0u32;
        let mut dropped = 0u32;
        host.focus_gained();
        for i in 0..400 {
            let space = if i % 2 == 0 {
                KeyEvent::down(KeyCode::SPACE, KeyModifiers::empty())
            } else {
                KeyEvent::released(KeyCode::SPACE, KeyModifiers::empty())
            };
            for accepted in [
                host.push_key(space),
                host.push_pointer(PointerEvent::wheel(MouseButtons::empty(), Point::new(i, i), WHEEL_DELTA)),
            ] {
                if accepted {
                    sent += 1;
                } else {
                    dropped += 1;
                }
            }
            if i % 50 == 0 {
                thread::sleep(Duration::from_millis(20));
            }
        }
        (sent, dropped)
    });

    engine.run(&mut ())?;
    let (sent, dropped) = producer.join().expect("producer thread panicked");

    let stats = engine.game();
    println!("frames:       {}", stats.frames);
    println!("updates:      {} ({:.1} per frame)", stats.updates, stats.updates as f64 / stats.frames as f64);
    println!("space taps:   {}", stats.presses);
    println!("wheel total:  {}", stats.wheel);
    println!("game time:    {:.3}s", stats.game_time);
    println!("last fps:     {:.1}", engine.current_fps());
    println!("events sent:  {sent} (dropped {dropped})");
    Ok(())
}
