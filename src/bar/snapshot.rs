//! Point-in-time copies of a bar's counters.

use std::time::{Duration, Instant};

/// A plain copy of the counters of a [`Bar`](super::Bar) taken under its lock.
///
/// Render segments and mutation listeners only ever see snapshots, so a
/// segment can never observe a half-applied mutation and never needs to lock
/// the bar it renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) current: i64,
    pub(crate) total: i64,
    pub(crate) last: i64,
    pub(crate) start_time: Instant,
    pub(crate) last_time: Instant,
}

impl Snapshot {
    /// Creates a snapshot stamped with the current instant.
    pub fn new(current: i64, total: i64) -> Self {
        let now = Instant::now();
        Self {
            current,
            total,
            last: 0,
            start_time: now,
            last_time: now,
        }
    }

    /// Sets the delta applied by the most recent mutation.
    pub fn with_last(mut self, last: i64) -> Self {
        self.last = last;
        self
    }

    /// Sets the start and last mutation instants.
    pub fn with_times(mut self, start_time: Instant, last_time: Instant) -> Self {
        self.start_time = start_time;
        self.last_time = last_time;
        self
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Signed delta applied by the most recent mutation.
    pub fn last(&self) -> i64 {
        self.last
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Instant of the most recent mutation.
    pub fn last_time(&self) -> Instant {
        self.last_time
    }

    /// Time elapsed since the bar was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Completion ratio in `[0, 1]`.
    ///
    /// Returns `0.0` when the total is not positive.
    pub fn rate(&self) -> f64 {
        if self.total <= 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// Whether the counter has reached the total.
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}
