//! Construction-time configuration for a [`Bar`](super::Bar).
//!
//! Every field has a documented default, so a configuration usually starts
//! from `BarConfig::default()` and overrides a handful of fields:
//!
//! ```rust
//! use linebar::bar::{Bar, BarConfig};
//!
//! let bar = Bar::new(BarConfig {
//!     total: 100,
//!     prefix: "fetch ".into(),
//!     ..BarConfig::hidden()
//! });
//! assert_eq!(bar.total(), 100);
//! ```

use crate::format::Segment;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use super::{Bar, Snapshot};

/// Callback invoked after every mutation, in registration order.
pub type Listener = Arc<dyn Fn(&Bar, &Snapshot) + Send + Sync>;

/// Callback invoked once, when the bar closes.
pub type FinalCallback = Arc<dyn Fn(&Bar) + Send + Sync>;

/// Configuration structure for a bar.
pub struct BarConfig {
    /// Initial counter, clamped to `total`. Defaults to 0.
    pub current: i64,
    /// Initial total. Defaults to 0.
    pub total: i64,
    /// Output sink. `None` writes to stdout.
    pub writer: Option<Box<dyn Write + Send>>,
    /// Literal text before the rendered segments.
    pub prefix: String,
    /// Literal text after the rendered segments.
    pub suffix: String,
    /// Render segments. `None` uses [`default_segments`](crate::format::default_segments).
    pub segments: Option<Vec<Segment>>,
    /// Separator between segments. Defaults to two spaces.
    pub split: String,
    /// Listeners registered before the bar is handed out.
    pub listeners: Vec<Listener>,
    /// Callback run once the bar closes.
    pub on_final: Option<FinalCallback>,
    /// Flush after every mutation.
    pub auto_flush: bool,
    /// Flush from a background thread at this interval until the bar closes.
    pub flush_interval: Option<Duration>,
    /// Write the first frame as soon as the bar is built.
    pub flush_on_build: bool,
}

impl BarConfig {
    /// Default separator between render segments.
    pub const DEFAULT_SPLIT: &'static str = "  ";

    /// A configuration whose output is discarded.
    pub fn hidden() -> Self {
        Self {
            writer: Some(Box::new(io::sink())),
            ..Self::default()
        }
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            current: 0,
            total: 0,
            writer: None,
            prefix: String::new(),
            suffix: String::new(),
            segments: None,
            split: Self::DEFAULT_SPLIT.into(),
            listeners: Vec::new(),
            on_final: None,
            auto_flush: false,
            flush_interval: None,
            flush_on_build: false,
        }
    }
}

impl std::fmt::Debug for BarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarConfig")
            .field("current", &self.current)
            .field("total", &self.total)
            .field("writer", &self.writer.is_some())
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("segments", &self.segments.as_ref().map(Vec::len))
            .field("split", &self.split)
            .field("listeners", &self.listeners.len())
            .field("on_final", &self.on_final.is_some())
            .field("auto_flush", &self.auto_flush)
            .field("flush_interval", &self.flush_interval)
            .field("flush_on_build", &self.flush_on_build)
            .finish()
    }
}
