//! Frame Timer: dedicated thread emitting tick signals.
//!
//! The timer only says "a tick is due". How long a tick actually takes is
//! decided by the frame loop's pacing, so the nominal interval is short
//! (1ms by default) and late ticks are simply coalesced.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick signal.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Signal number (monotonically increasing, gaps mean coalesced ticks).
    pub sequence: u64,
    /// When the signal was emitted.
    pub at: Instant,
}

/// Fixed-interval tick source running on its own thread.
pub struct FrameTimer {
    /// Handle to the timer thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick signals.
    tick_rx: Receiver<Tick>,
}

impl FrameTimer {
    /// Spawn a timer firing every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the timer thread.
    pub fn spawn(interval: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // One pending tick is enough: a busy loop should not find a backlog.
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("pulseloop-timer".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        })
    }

    /// Receiver to `select!` on.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the timer to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the timer and wait for its thread to exit.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // Discard a tick that raced with shutdown.
        while self.tick_rx.try_recv().is_ok() {}
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let mut sequence = 0u64;
        let mut next_tick = Instant::now() + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep((next_tick - now).min(Duration::from_millis(1)));
                continue;
            }

            // Full means the loop has not consumed the previous tick yet.
            match tick_tx.try_send(Tick { sequence, at: now }) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
            sequence += 1;
            next_tick += interval;
            if next_tick < now {
                next_tick = now + interval;
            }
        }
    }
}

impl Drop for FrameTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
