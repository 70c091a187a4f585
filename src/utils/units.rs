//! Human readable units used by the render segments.

use indicatif::HumanBytes;
use std::time::Duration;

/// Formats a byte count, e.g. `1.50 MiB`.
///
/// Negative counts render as zero bytes.
pub fn size_string(bytes: i64) -> String {
    HumanBytes(bytes.max(0) as u64).to_string()
}

/// Formats a byte throughput, e.g. `12.00 KiB/s`.
pub fn speed_string(bytes_per_second: f64) -> String {
    let bytes = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second as u64
    } else {
        0
    };
    format!("{}/s", HumanBytes(bytes))
}

/// Formats a duration truncated to whole seconds, e.g. `1m 18s`.
pub fn duration_string(duration: Duration) -> String {
    humantime::format_duration(Duration::from_secs(duration.as_secs())).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_string_clamps_negative() {
        assert_eq!(size_string(-5), size_string(0));
    }

    #[test]
    fn test_speed_string_non_finite() {
        assert_eq!(speed_string(f64::INFINITY), speed_string(0.0));
        assert_eq!(speed_string(f64::NAN), speed_string(0.0));
        assert!(speed_string(2048.0).ends_with("/s"));
    }

    #[test]
    fn test_duration_string_truncates() {
        assert_eq!(duration_string(Duration::from_millis(78_900)), "1m 18s");
        assert_eq!(duration_string(Duration::from_millis(400)), "0s");
    }
}
