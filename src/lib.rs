//! Linebar draws a single-line progress indicator on a terminal, fed by any
//! number of threads or tasks, and drives bounded concurrent work against it.
//!
//! # Quick Start
//!
//! ```rust
//! use linebar::{format, BarBuilder, Plan};
//!
//! let bar = BarBuilder::hidden()
//!     .total(100)
//!     .format(vec![format::plan(Plan::default().width(20)), format::rate_percent()])
//!     .build();
//! for _ in 0..100 {
//!     bar.add(1);
//!     bar.flush();
//! }
//! assert!(bar.is_closed());
//! ```
//!
//! # Module Organization
//!
//! - [`bar`] - The [`Bar`] handle, its configuration, builder and byte-counting reader
//! - [`format`] - Render segments: plan bar, rates, speeds, remaining time, animations
//! - [`coroutine`] - [`Coroutine`], bounded concurrent tasks over one bar
//! - [`download`] - Single-file download and copy helpers with a byte bar
//! - [`hls`] - HLS playlist decoding and segment downloads
//! - [`http`] - HTTP client setup and fetching to a file
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`utils`] - Human readable sizes, speeds and durations

pub mod bar;
pub mod coroutine;
pub mod download;
pub mod error;
pub mod format;
pub mod hls;
pub mod http;
pub mod utils;

pub use bar::{Bar, BarBuilder, BarConfig, Reader, Snapshot};
pub use coroutine::Coroutine;
pub use download::download_file;
pub use error::{Error, Result};
pub use format::{Format, Plan, RemainWindow, Segment};
pub use hls::{download_hls, HlsConfig, HlsConfigBuilder};
pub use http::{create_http_client, HttpClientConfig};
