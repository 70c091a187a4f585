//! Render segments and their composition.
//!
//! A segment turns a [`Snapshot`] into a fragment of the progress line. The
//! bar joins its segments with a separator on every frame, so each segment is
//! re-rendered each time rather than cached by the bar.
//!
//! Stateless segments are plain closures:
//!
//! ```rust
//! use std::sync::Arc;
//! use linebar::bar::Snapshot;
//! use linebar::format::{Format, Segment};
//!
//! let left: Segment = Arc::new(|s: &Snapshot| format!("{} left", s.total() - s.current()));
//! assert_eq!(left.render(&Snapshot::new(3, 10)), "7 left");
//! ```
//!
//! Stateful segments such as [`RemainWindow`] and [`Speed`] are named types
//! that also implement [`Format::observe`] to sample every mutation.

mod basic;
mod plan;
mod remain;
mod speed;

pub use basic::{
    animation, animation_moon, animation_snake, animation_spinner, custom_rate_size_unit,
    custom_size, date, date_time, rate_percent, rate_size, rate_size_unit, text, time, used,
    used_second, MOON, SNAKE, SPINNER,
};
pub use plan::Plan;
pub use remain::{Remain, RemainWindow};
pub use speed::{Speed, SpeedAvg};

use crate::bar::Snapshot;

use std::sync::Arc;
use std::time::Duration;

/// Placeholder rendered when a value cannot be estimated yet.
pub const PLACEHOLDER: &str = "-";

/// A render segment.
pub trait Format: Send + Sync {
    /// Renders the fragment for this frame.
    fn render(&self, snapshot: &Snapshot) -> String;

    /// Called after every mutation of the owning bar, outside the bar's lock.
    fn observe(&self, _snapshot: &Snapshot) {}
}

impl<F> Format for F
where
    F: Fn(&Snapshot) -> String + Send + Sync,
{
    fn render(&self, snapshot: &Snapshot) -> String {
        self(snapshot)
    }
}

/// Shared handle to a segment, as stored by a bar.
pub type Segment = Arc<dyn Format>;

/// Joins the rendered segments with `split`.
pub fn compose(segments: &[Segment], split: &str, snapshot: &Snapshot) -> String {
    match segments {
        [] => String::new(),
        [only] => only.render(snapshot),
        many => many
            .iter()
            .map(|segment| segment.render(snapshot))
            .collect::<Vec<_>>()
            .join(split),
    }
}

/// The fixed-width bar, e.g. `[■■■   ]`.
pub fn plan(plan: Plan) -> Segment {
    Arc::new(plan)
}

/// Speed of the last mutation, e.g. `13.0/s`, cached for 500ms.
pub fn speed() -> Segment {
    Arc::new(Speed::new())
}

/// Byte speed of the last mutation, e.g. `1.20 MiB/s`, cached for 500ms.
pub fn speed_unit() -> Segment {
    Arc::new(Speed::bytes())
}

/// Speed with a custom cache expiration.
pub fn speed_with_expiration(expiration: Duration, bytes: bool) -> Segment {
    let speed = if bytes { Speed::bytes() } else { Speed::new() };
    Arc::new(speed.expiration(expiration))
}

/// Average speed since the bar was created.
pub fn speed_avg() -> Segment {
    Arc::new(SpeedAvg { bytes: false })
}

/// Average byte speed since the bar was created.
pub fn speed_unit_avg() -> Segment {
    Arc::new(SpeedAvg { bytes: true })
}

/// Remaining time from the lifetime average speed.
pub fn remain() -> Segment {
    Arc::new(Remain)
}

/// Remaining time from recent samples. See [`RemainWindow`].
pub fn remain_window() -> Segment {
    Arc::new(RemainWindow::new())
}

/// Remaining time from at most `capacity` recent samples.
pub fn remain_window_with_capacity(capacity: usize) -> Segment {
    Arc::new(RemainWindow::with_capacity(capacity))
}

/// Plan bar, `current/total`, speed and windowed remaining time.
pub fn default_segments(bar: Plan) -> Vec<Segment> {
    vec![plan(bar), rate_size(), speed(), remain_window()]
}

/// Like [`default_segments`] with byte units.
pub fn default_unit_segments(bar: Plan) -> Vec<Segment> {
    vec![plan(bar), rate_size_unit(), speed_unit(), remain_window()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_empty() {
        assert_eq!(compose(&[], " | ", &Snapshot::new(1, 2)), "");
    }

    #[test]
    fn test_compose_single_ignores_split() {
        let segments = vec![text("only")];
        assert_eq!(compose(&segments, " | ", &Snapshot::new(1, 2)), "only");
    }

    #[test]
    fn test_compose_joins_in_order() {
        let segments = vec![text("a"), rate_size(), text("c")];
        assert_eq!(compose(&segments, " : ", &Snapshot::new(1, 2)), "a : 1/2 : c");
    }
}
