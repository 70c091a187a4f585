//! Shared utility functions.
//!
//! - [`units`] - Human readable byte sizes, speeds and durations

pub mod units;

pub use units::{duration_string, size_string, speed_string};
