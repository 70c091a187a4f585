//! Remaining-time estimators.

use super::{Format, PLACEHOLDER};
use crate::bar::Snapshot;
use crate::utils::duration_string;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Remaining time from the average speed since the bar was created.
#[derive(Debug, Clone, Copy, Default)]
pub struct Remain;

impl Format for Remain {
    fn render(&self, snapshot: &Snapshot) -> String {
        let rate = snapshot.rate();
        if rate <= 0.0 {
            return PLACEHOLDER.into();
        }
        let spent = snapshot.elapsed().as_secs_f64();
        let remaining = spent / rate - spent;
        match Duration::try_from_secs_f64(remaining.max(0.0)) {
            Ok(remaining) => duration_string(remaining),
            Err(_) => PLACEHOLDER.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    current: i64,
    time: Instant,
}

#[derive(Debug, Default)]
struct Window {
    armed: bool,
    capacity: usize,
    samples: VecDeque<Sample>,
}

/// Remaining time from the speed over the most recent mutations.
///
/// The window keeps at most `capacity` `(counter, instant)` samples and drops
/// the oldest first. The estimate is the average time per unit between the
/// oldest and newest sample, times the units still missing, so it follows
/// changes in throughput instead of averaging over the whole run.
///
/// Sampling starts with the first render. Unless set explicitly, the capacity
/// is chosen then as `total / 10` clamped to `[500, 1000]`. Until the counter
/// has moved inside the window the segment renders `-`.
#[derive(Debug, Default)]
pub struct RemainWindow {
    capacity: Option<usize>,
    window: Mutex<Window>,
}

impl RemainWindow {
    pub const MIN_CAPACITY: usize = 500;
    pub const MAX_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// A window of at most `capacity` samples, regardless of the total.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            window: Mutex::default(),
        }
    }

    /// Capacity used when none was configured.
    pub fn default_capacity(total: i64) -> usize {
        (total / 10).clamp(Self::MIN_CAPACITY as i64, Self::MAX_CAPACITY as i64) as usize
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.window.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estimated time until the counter reaches `total`.
    ///
    /// `None` when the window is empty, the counter did not advance in it, or
    /// the estimate does not fit in a [`Duration`].
    pub fn estimate(&self, total: i64) -> Option<Duration> {
        let (oldest, newest) = {
            let window = self.window.lock();
            (*window.samples.front()?, *window.samples.back()?)
        };

        let units = newest.current.saturating_sub(oldest.current);
        if units <= 0 {
            return None;
        }
        let per_unit = newest.time.duration_since(oldest.time).as_secs_f64() / units as f64;
        let missing = total.saturating_sub(newest.current).max(0) as f64;
        let remaining = per_unit * missing;
        Duration::try_from_secs_f64(remaining).ok()
    }
}

impl Format for RemainWindow {
    fn render(&self, snapshot: &Snapshot) -> String {
        {
            let mut window = self.window.lock();
            if !window.armed {
                window.armed = true;
                window.capacity = self
                    .capacity
                    .unwrap_or_else(|| Self::default_capacity(snapshot.total()));
            }
        }

        match self.estimate(snapshot.total()) {
            Some(remaining) => duration_string(remaining),
            None => PLACEHOLDER.into(),
        }
    }

    fn observe(&self, snapshot: &Snapshot) {
        let mut window = self.window.lock();
        if !window.armed {
            return;
        }
        window.samples.push_back(Sample {
            current: snapshot.current(),
            time: snapshot.last_time(),
        });
        while window.samples.len() > window.capacity {
            window.samples.pop_front();
        }
    }
}
