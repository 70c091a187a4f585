//! Throughput segments.

use super::Format;
use crate::bar::Snapshot;
use crate::utils::speed_string;

use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct SpeedCache {
    last_render: Option<Instant>,
    text: Option<(String, Instant)>,
}

/// Speed of the most recent mutation: its delta over the time since the
/// previous render.
///
/// The rendered text is kept for an expiration window (500ms by default) so
/// fast redraws do not flicker.
#[derive(Debug)]
pub struct Speed {
    bytes: bool,
    expiration: Duration,
    cache: Mutex<SpeedCache>,
}

impl Default for Speed {
    fn default() -> Self {
        Self {
            bytes: false,
            expiration: Self::DEFAULT_EXPIRATION,
            cache: Mutex::default(),
        }
    }
}

impl Speed {
    pub const DEFAULT_EXPIRATION: Duration = Duration::from_millis(500);

    /// Plain units, e.g. `13.0/s`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte units, e.g. `1.20 MiB/s`.
    pub fn bytes() -> Self {
        Self {
            bytes: true,
            ..Self::default()
        }
    }

    /// How long a rendered value is reused.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    fn text(&self, per_second: f64) -> String {
        if self.bytes {
            speed_string(per_second)
        } else {
            format!("{per_second:.1}/s")
        }
    }
}

impl Format for Speed {
    fn render(&self, snapshot: &Snapshot) -> String {
        let now = Instant::now();
        let mut cache = self.cache.lock();
        let since = cache.last_render.replace(now).unwrap_or(snapshot.start_time());

        if let Some((text, at)) = &cache.text {
            if now.duration_since(*at) < self.expiration {
                return text.clone();
            }
        }

        let seconds = now.duration_since(since).as_secs_f64();
        let per_second = if seconds > 0.0 {
            snapshot.last().max(0) as f64 / seconds
        } else {
            0.0
        };
        let text = self.text(per_second);
        cache.text = Some((text.clone(), now));
        text
    }
}

/// Average speed since the bar was created.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedAvg {
    pub(crate) bytes: bool,
}

impl Format for SpeedAvg {
    fn render(&self, snapshot: &Snapshot) -> String {
        let seconds = snapshot.elapsed().as_secs_f64();
        let per_second = if seconds > 0.0 {
            snapshot.current().max(0) as f64 / seconds
        } else {
            0.0
        };
        if self.bytes {
            speed_string(per_second)
        } else {
            format!("{per_second:.1}/s")
        }
    }
}
