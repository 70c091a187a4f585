//! Builder pattern implementation for creating [`Bar`] instances.
//!
//! # Examples
//!
//! ```rust
//! use linebar::bar::BarBuilder;
//! use linebar::format::{self, Plan};
//!
//! let bar = BarBuilder::hidden()
//!     .total(60)
//!     .format(vec![format::plan(Plan::default().style(">")), format::rate_percent()])
//!     .split(" : ")
//!     .on_final(|bar| bar.log("done"))
//!     .build();
//! assert_eq!(bar.total(), 60);
//! ```

use super::config::BarConfig;
use super::{Bar, Snapshot};
use crate::format::Segment;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Bar`].
#[derive(Debug, Default)]
pub struct BarBuilder {
    config: BarConfig,
}

impl BarBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        BarBuilder::default()
    }

    /// Convenience function to discard all output.
    pub fn hidden() -> Self {
        BarBuilder {
            config: BarConfig::hidden(),
        }
    }

    /// Sets the initial counter.
    pub fn current(mut self, current: i64) -> Self {
        self.config.current = current;
        self
    }

    /// Sets the total.
    pub fn total(mut self, total: i64) -> Self {
        self.config.total = total;
        self
    }

    /// Sets the output sink.
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.config.writer = Some(Box::new(writer));
        self
    }

    /// Writes to stderr instead of stdout.
    pub fn stderr(self) -> Self {
        self.writer(io::stderr())
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    /// Sets the render segments.
    pub fn format(mut self, segments: Vec<Segment>) -> Self {
        self.config.segments = Some(segments);
        self
    }

    /// Sets the separator between segments.
    pub fn split(mut self, split: impl Into<String>) -> Self {
        self.config.split = split.into();
        self
    }

    /// Registers a mutation listener.
    pub fn on_mutate<F>(mut self, listener: F) -> Self
    where
        F: Fn(&Bar, &Snapshot) + Send + Sync + 'static,
    {
        self.config.listeners.push(Arc::new(listener));
        self
    }

    /// Sets the callback run once when the bar closes.
    pub fn on_final<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Bar) + Send + Sync + 'static,
    {
        self.config.on_final = Some(Arc::new(callback));
        self
    }

    /// Flush after every mutation.
    pub fn auto_flush(mut self, enabled: bool) -> Self {
        self.config.auto_flush = enabled;
        self
    }

    /// Flush periodically from a background thread until the bar closes.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = Some(interval);
        self
    }

    /// Write the first frame as soon as the bar is built.
    pub fn flush_on_build(mut self, enabled: bool) -> Self {
        self.config.flush_on_build = enabled;
        self
    }

    /// Returns the configuration collected so far.
    pub fn into_config(self) -> BarConfig {
        self.config
    }

    /// Create the [`Bar`] with the specified options.
    pub fn build(self) -> Bar {
        Bar::new(self.config)
    }
}
