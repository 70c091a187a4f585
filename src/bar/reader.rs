//! A [`Read`] wrapper that reports bytes to a [`Bar`].

use std::io::{self, Read};

use super::Bar;

/// Wraps a reader and advances a [`Bar`] by the bytes each read returns.
///
/// Every call also flushes the bar, so the line redraws as data arrives.
/// Read errors are returned unchanged.
pub struct Reader<R> {
    inner: R,
    bar: Bar,
}

impl<R> Reader<R> {
    pub fn new(inner: R, bar: Bar) -> Self {
        Self { inner, bar }
    }

    /// The bar this reader reports to.
    pub fn bar(&self) -> &Bar {
        &self.bar
    }

    /// Unwraps the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let result = self.inner.read(buf);
        if let Ok(n) = result {
            self.bar.add(n as i64);
        }
        self.bar.flush();
        result
    }
}
