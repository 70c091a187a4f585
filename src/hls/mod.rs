//! HLS (HTTP Live Streaming) segment downloads.
//!
//! A media playlist is decoded into its segment URIs, then every segment is
//! fetched on a [`Coroutine`](crate::coroutine::Coroutine) so one progress
//! line counts finished segments.
//!
//! ```rust,no_run
//! use linebar::hls::{download_hls, HlsConfigBuilder};
//!
//! # async fn example() -> Result<(), linebar::Error> {
//! let config = HlsConfigBuilder::new().concurrency(8).retries(3).build();
//! let report = download_hls("https://example.com/video/index.m3u8", "video", config).await?;
//! println!("{}/{} segments", report.completed, report.segments);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod downloader;
pub mod playlist;

pub use config::{HlsConfig, HlsConfigBuilder};
pub use downloader::{download_hls, download_hls_with, segment_path, HlsReport};
pub use playlist::{decode_playlist, parse_playlist};
