//! Delays between failed probe attempts.

use std::time::Duration;

/// Computes how long to wait after a failed probe before the next one.
pub trait IntervalFunction: Send + Sync {
    /// Delay after the failure of probe number `attempt` (0-indexed).
    fn next_interval(&self, attempt: usize) -> Duration;
}

/// The same delay after every failure.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    duration: Duration,
}

impl FixedInterval {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl IntervalFunction for FixedInterval {
    fn next_interval(&self, _attempt: usize) -> Duration {
        self.duration
    }
}

/// Delay growing by `multiplier` after each failure, optionally capped.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Option<Duration>,
}

impl ExponentialBackoff {
    /// Creates an exponential backoff doubling from `initial_interval`.
    pub fn new(initial_interval: Duration) -> Self {
        Self {
            initial_interval,
            multiplier: 2.0,
            max_interval: None,
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = Some(max_interval);
        self
    }
}

impl IntervalFunction for ExponentialBackoff {
    fn next_interval(&self, attempt: usize) -> Duration {
        // Probing never gives up, so the exponent has to stay finite.
        let exponent = attempt.min(64) as i32;
        let scaled = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        let interval = if scaled.is_finite() && scaled < Duration::MAX.as_secs_f64() {
            Duration::from_secs_f64(scaled.max(0.0))
        } else {
            Duration::MAX
        };

        match self.max_interval {
            Some(max) => interval.min(max),
            None => interval,
        }
    }
}

/// Backoff computed by a closure.
pub struct FnInterval<F> {
    f: F,
}

impl<F> FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> IntervalFunction for FnInterval<F>
where
    F: Fn(usize) -> Duration + Send + Sync,
{
    fn next_interval(&self, attempt: usize) -> Duration {
        (self.f)(attempt)
    }
}
