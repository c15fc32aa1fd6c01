//! Monotonic clocks driving the frame loop.

use std::time::{Duration, Instant};

/// Source of monotonic time for frame pacing.
///
/// Readings are seconds since the clock was first started; they never go
/// backwards while the clock runs.
pub trait Clock {
    /// Start (or resume) counting.
    fn start(&mut self);

    /// Stop counting. Readings freeze until the next `start`.
    fn stop(&mut self);

    /// Seconds counted so far.
    fn now(&self) -> f64;
}

/// Wall-clock stopwatch backed by [`Instant`].
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    /// Start of the current running span.
    started: Option<Instant>,
    /// Time accumulated by earlier spans.
    accumulated: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch reading zero.
    pub const fn new() -> Self {
        Self {
            started: None,
            accumulated: Duration::ZERO,
        }
    }

    /// Whether the stopwatch is counting.
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total counted time.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }
}

impl Clock for Stopwatch {
    fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn now(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct StepClock {
    now: std::cell::Cell<f64>,
    step: f64,
}

#[cfg(test)]
impl StepClock {
    pub(crate) const fn new(step: f64) -> Self {
        Self {
            now: std::cell::Cell::new(0.0),
            step,
        }
    }
}

#[cfg(test)]
impl Clock for StepClock {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn now(&self) -> f64 {
        let now = self.now.get() + self.step;
        self.now.set(now);
        now
    }
}
