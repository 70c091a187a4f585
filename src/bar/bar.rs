//! The progress state and its mutation protocol.
//!
//! A [`Bar`] owns a counter, a total, the render segments and the output sink.
//! Every field lives behind one exclusive lock, which is also held while a
//! frame is rendered and written. Listeners and segment observers run after
//! the lock is released, so a listener may call back into [`Bar::add`] or
//! [`Bar::flush`].
//!
//! # Examples
//!
//! ```rust
//! use linebar::bar::{Bar, BarConfig};
//!
//! let bar = Bar::new(BarConfig { total: 3, ..BarConfig::hidden() });
//! bar.add(1);
//! assert!(!bar.flush());
//! bar.add(5);
//! assert_eq!(bar.current(), 3);
//! assert!(bar.flush());
//! ```

use super::config::{BarConfig, FinalCallback, Listener};
use super::reader::Reader;
use super::Snapshot;
use crate::format::{self, Plan, Segment};

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, BufReader, Read, Write};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Control sequence written before every frame: carriage return, then clear
/// to the end of the line.
pub const CLEAR_LINE: &str = "\r\x1b[K";

/// A thread-safe, cloneable handle to a single-line progress indicator.
///
/// Cloning is cheap and every clone drives the same line.
#[derive(Clone)]
pub struct Bar {
    inner: Arc<Inner>,
}

struct Inner {
    start_time: Instant,
    state: Mutex<State>,
}

struct State {
    current: i64,
    total: i64,
    last: i64,
    last_time: Instant,
    prefix: String,
    suffix: String,
    split: String,
    segments: Vec<Segment>,
    writer: Box<dyn Write + Send>,
    listeners: Vec<Listener>,
    on_final: Option<FinalCallback>,
    closed: bool,
}

impl State {
    fn snapshot(&self, start_time: Instant) -> Snapshot {
        Snapshot {
            current: self.current,
            total: self.total,
            last: self.last,
            start_time,
            last_time: self.last_time,
        }
    }

    fn render(&self, snapshot: &Snapshot) -> String {
        let body = format::compose(&self.segments, &self.split, snapshot);
        let mut line = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len());
        line.push_str(&self.prefix);
        line.push_str(&body);
        line.push_str(&self.suffix);
        line
    }

    /// Writes `bytes` in a single call. Sink failures never reach the caller.
    fn write(&mut self, bytes: &[u8]) {
        let result = self
            .writer
            .write_all(bytes)
            .and_then(|_| self.writer.flush());
        if let Err(e) = result {
            warn!(error = %e, "failed to write to progress sink");
        }
    }

    /// Marks the state closed and returns the finalizer to run, once.
    fn close(&mut self) -> Option<FinalCallback> {
        if self.closed {
            return None;
        }
        self.write(b"\n");
        self.closed = true;
        debug!(current = self.current, total = self.total, "progress closed");
        self.on_final.clone()
    }
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Bar")
            .field("current", &state.current)
            .field("total", &state.total)
            .field("last", &state.last)
            .field("segments", &state.segments.len())
            .field("listeners", &state.listeners.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self::new(BarConfig::default())
    }
}

impl Bar {
    /// Creates a bar from its configuration.
    ///
    /// The total is applied before the initial counter, so `current` is always
    /// clamped against the configured total.
    pub fn new(config: BarConfig) -> Self {
        let now = Instant::now();
        let segments = config
            .segments
            .unwrap_or_else(|| format::default_segments(Plan::default()));
        let writer = config
            .writer
            .unwrap_or_else(|| Box::new(io::stdout()));

        let mut listeners = config.listeners;
        if config.auto_flush {
            listeners.push(Arc::new(|bar: &Bar, _: &Snapshot| {
                bar.flush();
            }));
        }

        let bar = Self {
            inner: Arc::new(Inner {
                start_time: now,
                state: Mutex::new(State {
                    current: config.current.min(config.total),
                    total: config.total,
                    last: 0,
                    last_time: now,
                    prefix: config.prefix,
                    suffix: config.suffix,
                    split: config.split,
                    segments,
                    writer,
                    listeners,
                    on_final: config.on_final,
                    closed: false,
                }),
            }),
        };

        if let Some(interval) = config.flush_interval {
            bar.spawn_ticker(interval);
        }
        if config.flush_on_build {
            bar.flush();
        }
        bar
    }

    /// Flushes from a background thread until the bar closes or is dropped.
    fn spawn_ticker(&self, interval: Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let spawned = thread::Builder::new()
            .name("linebar-flush".into())
            .spawn(move || loop {
                thread::sleep(interval);
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let bar = Bar { inner };
                if bar.flush() {
                    break;
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "failed to start the periodic flush thread");
        }
    }

    /// Advances the counter by `n`, clamped to the total.
    pub fn add(&self, n: i64) {
        self.mutate(|state| {
            state.current = state.current.saturating_add(n).min(state.total);
            state.last = n;
        });
    }

    /// Sets the counter, clamped to the total from above only.
    ///
    /// A value below the current counter moves progress backwards.
    pub fn set_current(&self, current: i64) {
        self.mutate(|state| {
            let current = current.min(state.total);
            state.last = current.saturating_sub(state.current);
            state.current = current;
        });
    }

    /// Applies `f` under the lock, then notifies observers with the resulting
    /// snapshot once the lock is released.
    fn mutate(&self, f: impl FnOnce(&mut State)) {
        let (snapshot, segments, listeners) = {
            let mut state = self.inner.state.lock();
            f(&mut state);
            state.last_time = Instant::now();
            (
                state.snapshot(self.inner.start_time),
                state.segments.clone(),
                state.listeners.clone(),
            )
        };

        for segment in &segments {
            segment.observe(&snapshot);
        }
        for listener in &listeners {
            listener(self, &snapshot);
        }
    }

    /// Replaces the total. The counter is clamped by the next mutation.
    pub fn set_total(&self, total: i64) {
        self.inner.state.lock().total = total;
    }

    /// Replaces the render segments.
    ///
    /// No segment renders an empty string, one segment is used as is, several
    /// are joined with the separator on every frame.
    pub fn set_format(&self, segments: Vec<Segment>) {
        self.inner.state.lock().segments = segments;
    }

    /// Sets the separator between segments.
    pub fn set_split(&self, split: impl Into<String>) {
        self.inner.state.lock().split = split.into();
    }

    /// Sets the literal text drawn before the segments.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.state.lock().prefix = prefix.into();
    }

    /// Sets the literal text drawn after the segments.
    pub fn set_suffix(&self, suffix: impl Into<String>) {
        self.inner.state.lock().suffix = suffix.into();
    }

    /// Swaps the output sink.
    pub fn set_writer(&self, writer: impl Write + Send + 'static) {
        self.inner.state.lock().writer = Box::new(writer);
    }

    /// Registers a listener fired after every later mutation.
    pub fn on_mutate<F>(&self, listener: F)
    where
        F: Fn(&Bar, &Snapshot) + Send + Sync + 'static,
    {
        self.inner.state.lock().listeners.push(Arc::new(listener));
    }

    /// Sets the callback run when the bar closes, replacing any previous one.
    pub fn on_final<F>(&self, callback: F)
    where
        F: Fn(&Bar) + Send + Sync + 'static,
    {
        self.inner.state.lock().on_final = Some(Arc::new(callback));
    }

    /// Writes one frame and closes the bar once the counter reaches the total.
    ///
    /// Returns whether the bar is closed. Flushing a closed bar writes nothing.
    pub fn flush(&self) -> bool {
        let finalizer = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return true;
            }

            let snapshot = state.snapshot(self.inner.start_time);
            let mut line = state.render(&snapshot);
            if !line.starts_with('\r') {
                line.insert_str(0, CLEAR_LINE);
            }
            state.write(line.as_bytes());

            if !snapshot.is_complete() {
                return false;
            }
            state.close()
        };

        if let Some(callback) = finalizer {
            callback(self);
        }
        true
    }

    /// Closes the bar without waiting for the counter to reach the total.
    ///
    /// Closing twice has no further effect.
    pub fn close(&self) {
        let finalizer = self.inner.state.lock().close();
        if let Some(callback) = finalizer {
            callback(self);
        }
    }

    /// Writes a message on its own line above the progress line.
    ///
    /// Accepts anything displayable, including `format_args!`.
    pub fn log(&self, message: impl fmt::Display) {
        let mut line = format!("{CLEAR_LINE}{message}");
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.inner.state.lock().write(line.as_bytes());
    }

    /// Progress counter.
    pub fn current(&self) -> i64 {
        self.inner.state.lock().current
    }

    /// Value at which the bar closes.
    pub fn total(&self) -> i64 {
        self.inner.state.lock().total
    }

    /// Signed delta applied by the most recent mutation.
    pub fn last(&self) -> i64 {
        self.inner.state.lock().last
    }

    /// Instant the bar was created.
    pub fn start_time(&self) -> Instant {
        self.inner.start_time
    }

    /// Instant of the most recent mutation.
    pub fn last_time(&self) -> Instant {
        self.inner.state.lock().last_time
    }

    /// Completion ratio in `[0, 1]`, `0.0` when the total is zero.
    pub fn rate(&self) -> f64 {
        self.snapshot().rate()
    }

    /// Whether the final newline has been written.
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// A consistent copy of the counters.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.lock().snapshot(self.inner.start_time)
    }

    /// The current line without the control sequence.
    pub fn render(&self) -> String {
        let state = self.inner.state.lock();
        let snapshot = state.snapshot(self.inner.start_time);
        state.render(&snapshot)
    }

    /// Copies `reader` into `writer`, advancing the bar by every byte read.
    pub fn copy<W, R>(&self, writer: &mut W, reader: R) -> io::Result<u64>
    where
        W: Write + ?Sized,
        R: Read,
    {
        self.copy_buf(writer, reader, 4 << 10)
    }

    /// Like [`copy`](Self::copy) with an explicit read buffer size.
    pub fn copy_buf<W, R>(&self, writer: &mut W, reader: R, capacity: usize) -> io::Result<u64>
    where
        W: Write + ?Sized,
        R: Read,
    {
        let mut reader = Reader::new(BufReader::with_capacity(capacity, reader), self.clone());
        io::copy(&mut reader, writer)
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hidden(total: i64) -> Bar {
        Bar::new(BarConfig {
            total,
            ..BarConfig::hidden()
        })
    }

    #[test]
    fn test_add_clamps_to_total() {
        let bar = hidden(10);
        bar.add(7);
        bar.add(7);
        assert_eq!(bar.current(), 10);
        assert_eq!(bar.last(), 7);
    }

    #[test]
    fn test_set_current_can_regress() {
        let bar = hidden(10);
        bar.set_current(8);
        bar.set_current(3);
        assert_eq!(bar.current(), 3);
        assert_eq!(bar.last(), -5);

        bar.set_current(-2);
        assert_eq!(bar.current(), -2);
    }

    #[test]
    fn test_set_current_extreme_regression_saturates() {
        let bar = hidden(10);
        bar.set_current(5);
        bar.set_current(i64::MIN);
        assert_eq!(bar.current(), i64::MIN);
        assert_eq!(bar.last(), i64::MIN);

        bar.set_current(i64::MAX);
        assert_eq!(bar.current(), 10);
        assert_eq!(bar.last(), i64::MAX);
    }

    #[test]
    fn test_set_total_does_not_clamp_until_next_mutation() {
        let bar = hidden(10);
        bar.add(8);
        bar.set_total(5);
        assert_eq!(bar.current(), 8);
        bar.add(0);
        assert_eq!(bar.current(), 5);
    }

    #[test]
    fn test_initial_current_is_clamped() {
        let bar = Bar::new(BarConfig {
            current: 20,
            total: 10,
            ..BarConfig::hidden()
        });
        assert_eq!(bar.current(), 10);
    }

    #[test]
    fn test_listener_may_reenter() {
        let bar = hidden(5);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        bar.on_mutate(move |bar, snapshot| {
            seen.fetch_add(1, Ordering::SeqCst);
            // Re-entering the bar from a listener must not deadlock.
            assert_eq!(bar.total(), snapshot.total());
            bar.flush();
        });

        bar.add(1);
        bar.add(4);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(bar.is_closed());
    }

    #[test]
    fn test_finalizer_may_log() {
        let bar = hidden(1);
        bar.on_final(|bar| bar.log("done"));
        bar.add(1);
        assert!(bar.flush());
    }

    #[test]
    fn test_display_has_no_control_sequence() {
        let bar = Bar::new(BarConfig {
            total: 4,
            prefix: "<".into(),
            suffix: ">".into(),
            segments: Some(vec![format::rate_size()]),
            ..BarConfig::hidden()
        });
        bar.add(1);
        assert_eq!(bar.to_string(), "<1/4>");
    }
}
