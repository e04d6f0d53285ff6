//! Fixed-interval timing utilities

/// Accumulates frame deltas and fires once per configured interval.
///
/// Driven explicitly by the embedding loop, so it works the same under a
/// real clock, a fixed-step simulation or a test.
#[derive(Clone, Debug)]
pub struct IntervalTimer {
    /// Seconds between firings
    interval: f32,
    /// Time accumulated since the last firing
    accumulated: f32,
    /// Number of times the timer has fired
    fire_count: u64,
}

impl IntervalTimer {
    /// Create a new timer that fires every `interval_secs` seconds
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: interval_secs.max(0.0),
            accumulated: 0.0,
            fire_count: 0,
        }
    }

    /// Advance by `delta_secs`. Returns true if the interval elapsed.
    ///
    /// Fires at most once per call. Time beyond one interval is wrapped
    /// modulo the interval, so a long stall does not queue up a burst.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.accumulated += delta_secs;
        }

        if self.accumulated < self.interval {
            return false;
        }

        self.accumulated = if self.interval > 0.0 {
            self.accumulated % self.interval
        } else {
            0.0
        };
        self.fire_count += 1;
        true
    }

    /// Reset the accumulator without firing
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }

    /// Get the configured interval in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Get time accumulated towards the next firing
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Get total number of firings
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(0.1)
    }
}
