use linebar::bar::{Bar, BarBuilder};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Control sequence written before every frame and log line.
pub const CLEAR: &str = "\r\x1b[K";

/// A cloneable in-memory sink, so tests can read what a bar wrote.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Number of frames, log lines included.
    pub fn frames(&self) -> usize {
        self.contents().matches(CLEAR).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A builder writing into a fresh [`SharedBuffer`].
#[allow(dead_code)]
pub fn captured_builder(total: i64) -> (BarBuilder, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let builder = BarBuilder::new().total(total).writer(buffer.clone());
    (builder, buffer)
}

/// A bar with a single `current/total` segment writing into a [`SharedBuffer`].
#[allow(dead_code)]
pub fn counting_bar(total: i64) -> (Bar, SharedBuffer) {
    let (builder, buffer) = captured_builder(total);
    let bar = builder.format(vec![linebar::format::rate_size()]).build();
    (bar, buffer)
}

/// Creates a temporary directory for testing purposes
#[allow(dead_code)]
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
#[allow(dead_code)]
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
#[allow(dead_code)]
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Asserts that a file has the expected size
#[allow(dead_code)]
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}
