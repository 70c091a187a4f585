//! Stateless segments: text, clocks, animations, counters and elapsed time.

use super::Segment;
use crate::bar::Snapshot;
use crate::utils::{duration_string, size_string};

use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Classic spinner frames.
pub const SPINNER: [&str; 4] = ["-", "\\", "|", "/"];

/// A snake chasing its tail around a braille cell.
pub const SNAKE: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Moon phase frames.
pub const MOON: [&str; 8] = ["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"];

/// Fixed text.
pub fn text(text: impl Into<String>) -> Segment {
    let text = text.into();
    Arc::new(move |_: &Snapshot| text.clone())
}

/// Local wall clock time, e.g. `13:04:05`.
pub fn time() -> Segment {
    Arc::new(|_: &Snapshot| Local::now().format("%H:%M:%S").to_string())
}

/// Local date, e.g. `2006-01-02`.
pub fn date() -> Segment {
    Arc::new(|_: &Snapshot| Local::now().format("%Y-%m-%d").to_string())
}

/// Local date and time, e.g. `2006-01-02 13:04:05`.
pub fn date_time() -> Segment {
    Arc::new(|_: &Snapshot| Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

/// One frame per counter value, cycling through `frames`.
pub fn animation<I, S>(frames: I) -> Segment
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
    Arc::new(move |s: &Snapshot| {
        if frames.is_empty() {
            return String::new();
        }
        let index = s.current().rem_euclid(frames.len() as i64) as usize;
        frames[index].clone()
    })
}

pub fn animation_spinner() -> Segment {
    animation(SPINNER)
}

pub fn animation_snake() -> Segment {
    animation(SNAKE)
}

pub fn animation_moon() -> Segment {
    animation(MOON)
}

/// Percentage, e.g. `58.0%`.
pub fn rate_percent() -> Segment {
    Arc::new(|s: &Snapshot| format!("{:.1}%", s.rate() * 100.0))
}

/// Counter over total, e.g. `58/100`.
pub fn rate_size() -> Segment {
    Arc::new(|s: &Snapshot| format!("{}/{}", s.current(), s.total()))
}

/// Counter over total as byte sizes, e.g. `58 B/100 B`.
pub fn rate_size_unit() -> Segment {
    Arc::new(|s: &Snapshot| format!("{}/{}", size_string(s.current()), size_string(s.total())))
}

/// Time since the bar was created, e.g. `2m 20s`.
pub fn used() -> Segment {
    Arc::new(|s: &Snapshot| duration_string(s.elapsed()))
}

/// Seconds since the bar was created, e.g. `600.0s`.
pub fn used_second() -> Segment {
    Arc::new(|s: &Snapshot| format!("{:.1}s", s.elapsed().as_secs_f64()))
}

/// A byte size tracked outside the bar.
pub fn custom_size(size: Arc<AtomicU64>) -> Segment {
    Arc::new(move |_: &Snapshot| size_string(load(&size)))
}

/// Two byte sizes tracked outside the bar, e.g. `58 B/100 B`.
pub fn custom_rate_size_unit(size: Arc<AtomicU64>, total: Arc<AtomicU64>) -> Segment {
    Arc::new(move |_: &Snapshot| {
        format!("{}/{}", size_string(load(&size)), size_string(load(&total)))
    })
}

fn load(value: &AtomicU64) -> i64 {
    i64::try_from(value.load(Ordering::Relaxed)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    #[test]
    fn test_animation_cycles() {
        let spin = animation_spinner();
        assert_eq!(spin.render(&Snapshot::new(0, 10)), "-");
        assert_eq!(spin.render(&Snapshot::new(5, 10)), "\\");
        assert_eq!(spin.render(&Snapshot::new(-1, 10)), "/");
    }

    #[test]
    fn test_snake_wraps_around() {
        let snake = animation_snake();
        assert_eq!(snake.render(&Snapshot::new(0, 10)), "⣾");
        assert_eq!(snake.render(&Snapshot::new(7, 10)), "⣷");
        assert_eq!(snake.render(&Snapshot::new(8, 10)), "⣾");
    }

    #[test]
    fn test_animation_without_frames() {
        let empty = animation(Vec::<String>::new());
        assert_eq!(empty.render(&Snapshot::new(3, 10)), "");
    }

    #[test]
    fn test_rate_percent_zero_total() {
        assert_eq!(rate_percent().render(&Snapshot::new(3, 0)), "0.0%");
        assert_eq!(rate_percent().render(&Snapshot::new(58, 100)), "58.0%");
    }

    #[test]
    fn test_custom_size_reads_live_value() {
        let size = Arc::new(AtomicU64::new(0));
        let total = Arc::new(AtomicU64::new(2048));
        let segment = custom_rate_size_unit(size.clone(), total);
        let before = segment.render(&Snapshot::new(0, 1));
        size.store(1024, Ordering::Relaxed);
        assert_ne!(segment.render(&Snapshot::new(0, 1)), before);
    }
}
