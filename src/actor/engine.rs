//! Engine: drives a [`Game`] from timer ticks and host signals.
//!
//! The engine owns the frame loop and its input devices. Host threads talk
//! to it only through a [`HostHandle`]; everything else happens on the
//! thread that calls [`Engine::run`].

use super::messages::{HostHandle, HostSignal};
use super::timer::FrameTimer;
use crate::error::{ConfigError, EngineError, Result};
use crate::frame::{validate_ceiling, FrameLoop, Game, TickReport, UNBOUNDED_FPS};
use crate::input::Input;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::time::Duration;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Frame-rate ceiling enforced by busy-waiting.
    pub max_fps: f64,
    /// Nominal interval of the tick timer.
    pub timer_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_fps: UNBOUNDED_FPS,
            timer_interval: Duration::from_millis(1),
        }
    }
}

impl EngineConfig {
    /// Set the frame-rate ceiling.
    #[must_use]
    pub const fn with_max_fps(mut self, max_fps: f64) -> Self {
        self.max_fps = max_fps;
        self
    }

    /// Set the tick timer interval.
    #[must_use]
    pub const fn with_timer_interval(mut self, interval: Duration) -> Self {
        self.timer_interval = interval;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        validate_ceiling(self.max_fps)?;
        if self.timer_interval.is_zero() {
            return Err(ConfigError::ZeroTimerInterval);
        }
        Ok(())
    }
}

/// The main engine.
pub struct Engine<G: Game> {
    /// Configuration.
    config: EngineConfig,
    /// Frame loop and input devices.
    frame_loop: FrameLoop,
    /// Application callbacks.
    game: G,
    /// Host signal sender (cloned into host handles).
    signal_tx: Sender<HostSignal>,
    /// Host signal receiver.
    signal_rx: Receiver<HostSignal>,
    /// Set once a close was requested by the host or the game.
    close_requested: bool,
    /// Summary of the most recent tick.
    last_report: Option<TickReport>,
}

impl<G: Game> Engine<G> {
    /// Create an engine with default configuration.
    ///
    /// # Errors
    ///
    /// Infallible with the default configuration; kept fallible for symmetry
    /// with [`Engine::with_config`].
    pub fn new(game: G) -> Result<Self> {
        Self::with_config(game, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn with_config(game: G, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut frame_loop = FrameLoop::new();
        frame_loop.set_frame_rate_ceiling(config.max_fps)?;

        // Unbounded: signals are rare and a host must never stall on them.
        let (signal_tx, signal_rx) = unbounded();

        Ok(Self {
            config,
            frame_loop,
            game,
            signal_tx,
            signal_rx,
            close_requested: false,
            last_report: None,
        })
    }

    /// Handle for host threads.
    pub fn host_handle(&self) -> HostHandle {
        HostHandle::new(self.frame_loop.input().handle(), self.signal_tx.clone())
    }

    /// Run until the host or the game asks to close.
    ///
    /// Host signals queued before a tick are handled before that tick runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread cannot be spawned or dies while
    /// running. Nothing that happens inside a tick ends the loop.
    pub fn run(&mut self, surface: &mut G::Surface) -> Result<()> {
        let timer = FrameTimer::spawn(self.config.timer_interval)?;
        let signals = self.signal_rx.clone();
        self.close_requested = false;
        self.frame_loop.start();

        let result = loop {
            select! {
                recv(signals) -> signal => {
                    if let Ok(signal) = signal {
                        self.handle_signal(signal);
                    }
                }
                recv(timer.receiver()) -> tick => {
                    if tick.is_err() {
                        break Err(EngineError::TimerDisconnected);
                    }
                    while let Ok(signal) = signals.try_recv() {
                        self.handle_signal(signal);
                    }
                    if !self.close_requested {
                        if let Some(report) = self.frame_loop.tick(&mut self.game, surface) {
                            if report.input.rejected > 0 || report.present_failed {
                                tracing::debug!(?report, "tick completed with problems");
                            }
                            self.last_report = Some(report);
                        }
                        if self.game.should_close() {
                            tracing::info!(reason = "game", "shutdown requested");
                            self.close_requested = true;
                        }
                    }
                }
            }

            if self.close_requested {
                break Ok(());
            }
        };

        self.frame_loop.close();
        timer.join();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "engine stopped with error");
        }
        result
    }

    fn handle_signal(&mut self, signal: HostSignal) {
        match signal {
            HostSignal::FocusGained => self.frame_loop.input_mut().focus_gained(),
            HostSignal::FocusLost => self.frame_loop.input_mut().release_focus(),
            HostSignal::Close => {
                tracing::info!(reason = "host", "shutdown requested");
                self.close_requested = true;
            }
        }
    }

    /// Change the frame-rate ceiling; applies from the next tick.
    ///
    /// # Errors
    ///
    /// Rejects zero, negative or NaN values.
    pub fn set_frame_rate_ceiling(&mut self, max_fps: f64) -> std::result::Result<(), ConfigError> {
        self.frame_loop.set_frame_rate_ceiling(max_fps)?;
        self.config.max_fps = max_fps;
        Ok(())
    }

    /// Current frame-rate ceiling.
    pub const fn frame_rate_ceiling(&self) -> f64 {
        self.frame_loop.frame_rate_ceiling()
    }

    /// Instantaneous rate of the last tick.
    pub fn current_fps(&self) -> f64 {
        self.frame_loop.current_fps()
    }

    /// Summary of the most recent tick, if any ran.
    pub const fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Ticks completed so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame_loop.frame_count()
    }

    /// Whether the frame loop is currently ticking.
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Current input state.
    pub const fn input(&self) -> &Input {
        self.frame_loop.input()
    }

    /// Get a reference to the game.
    pub const fn game(&self) -> &G {
        &self.game
    }

    /// Get a mutable reference to the game.
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Consume the engine, returning the game.
    pub fn into_game(self) -> G {
        self.game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseButtons, Point, PointerEvent};
    use std::thread;

    /// Counts ticks and closes itself after `limit` renders.
    #[derive(Default)]
    struct Counter {
        renders: u64,
        limit: u64,
        saw_space: bool,
        saw_left: bool,
        focused: Vec<bool>,
    }

    impl Game for Counter {
        type Surface = ();

        fn update_logic(&mut self, input: &Input, _elapsed: f64) {
            self.saw_space |= input.keyboard.is_down(KeyCode::SPACE);
            self.saw_left |= input.pointer.is_down(MouseButton::Left);
            self.focused.push(input.pointer.has_focus());
        }

        fn update_time(&mut self, _elapsed: f64) {}

        fn render(&mut self, _surface: &mut ()) {
            self.renders += 1;
        }

        fn should_close(&self) -> bool {
            self.limit > 0 && self.renders >= self.limit
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default().with_max_fps(0.0);
        assert!(matches!(
            Engine::with_config(Counter::default(), config),
            Err(EngineError::Config(ConfigError::InvalidFrameRateCeiling(_)))
        ));

        let config = EngineConfig::default().with_timer_interval(Duration::ZERO);
        assert!(matches!(
            Engine::with_config(Counter::default(), config),
            Err(EngineError::Config(ConfigError::ZeroTimerInterval))
        ));
    }

    #[test]
    fn test_game_requested_close() {
        let game = Counter {
            limit: 5,
            ..Counter::default()
        };
        let mut engine = Engine::new(game).unwrap();
        engine.run(&mut ()).unwrap();

        assert_eq!(engine.game().renders, 5);
        assert_eq!(engine.frame_count(), 5);
        assert!(!engine.is_running());

        let report = engine.last_report().unwrap();
        assert_eq!(report.frame, 4);
        assert!(!report.present_failed);
    }

    #[test]
    fn test_last_report_counts_rejected_input() {
        let game = Counter {
            limit: 1,
            ..Counter::default()
        };
        let mut engine = Engine::new(game).unwrap();
        assert!(engine.last_report().is_none());

        let host = engine.host_handle();
        host.push_key(KeyEvent::down(KeyCode(0x8000), KeyModifiers::empty()));
        host.push_key(KeyEvent::down(KeyCode::SPACE, KeyModifiers::empty()));
        engine.run(&mut ()).unwrap();

        let report = engine.last_report().unwrap();
        assert_eq!(report.input.rejected, 1);
        assert_eq!(report.input.applied, 1);
    }

    #[test]
    fn test_host_input_and_close() {
        let config = EngineConfig::default().with_max_fps(500.0);
        let mut engine = Engine::with_config(Counter::default(), config).unwrap();
        let host = engine.host_handle();

        let producer = thread::spawn(move || {
            assert!(host.focus_gained());
            assert!(host.push_key(KeyEvent::down(KeyCode::SPACE, KeyModifiers::empty())));
            assert!(host.push_pointer(PointerEvent::down(MouseButtons::LEFT, Point::new(1, 1))));
            thread::sleep(Duration::from_millis(50));
            assert!(host.close());
        });

        engine.run(&mut ()).unwrap();
        producer.join().unwrap();

        let game = engine.into_game();
        assert!(game.saw_space);
        assert!(game.saw_left);
        assert!(game.renders > 0);
        assert_eq!(game.focused.last(), Some(&true));
    }

    #[test]
    fn test_focus_lost_signal_resets_pointer() {
        let game = Counter {
            limit: 3,
            ..Counter::default()
        };
        let mut engine = Engine::new(game).unwrap();
        let host = engine.host_handle();
        host.focus_gained();
        host.push_pointer(PointerEvent::down(MouseButtons::LEFT, Point::ZERO));
        host.focus_lost();

        engine.run(&mut ()).unwrap();

        // The press was discarded the moment focus loss was reported.
        let game = engine.game();
        assert!(!game.saw_left);
        assert!(game.focused.iter().all(|focused| !focused));
    }

    #[test]
    fn test_input_after_focus_regained_survives() {
        let game = Counter {
            limit: 3,
            ..Counter::default()
        };
        let mut engine = Engine::new(game).unwrap();
        let host = engine.host_handle();

        // All before the first tick: only the stale press may be discarded.
        host.push_pointer(PointerEvent::down(MouseButtons::LEFT, Point::ZERO));
        host.focus_lost();
        host.focus_gained();
        host.push_key(KeyEvent::down(KeyCode::SPACE, KeyModifiers::empty()));

        engine.run(&mut ()).unwrap();

        let game = engine.game();
        assert!(game.saw_space, "press after focus regain was discarded");
        assert!(!game.saw_left);
        assert!(game.focused.iter().all(|focused| *focused));
    }

    #[test]
    fn test_ceiling_change() {
        let mut engine = Engine::new(Counter::default()).unwrap();
        assert_eq!(engine.frame_rate_ceiling(), UNBOUNDED_FPS);
        engine.set_frame_rate_ceiling(60.0).unwrap();
        assert_eq!(engine.frame_rate_ceiling(), 60.0);
        assert!(engine.set_frame_rate_ceiling(-1.0).is_err());
        assert_eq!(engine.frame_rate_ceiling(), 60.0);
    }
}
