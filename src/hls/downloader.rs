//! Concurrent HLS segment downloads on a [`Coroutine`].

use super::config::HlsConfig;
use super::playlist::decode_playlist;
use crate::bar::{Bar, BarConfig};
use crate::coroutine::Coroutine;
use crate::error::{Error, Result};
use crate::format::{self, Plan};
use crate::http::{create_http_client, fetch_to_file, parse_proxy, HttpClientConfig};

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Outcome of an HLS download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HlsReport {
    /// Segments listed by the playlist.
    pub segments: usize,
    /// Segments on disk, fetched or already present.
    pub completed: u64,
    /// Segments that failed every attempt.
    pub failed: u64,
    /// Bytes of the completed segments.
    pub bytes: u64,
}

/// Downloads every segment of the playlist at `source` into `dir`.
///
/// Progress is drawn on stdout. See [`download_hls_with`].
pub async fn download_hls(source: &str, dir: impl AsRef<Path>, config: HlsConfig) -> Result<HlsReport> {
    download_hls_with(source, dir, config, BarConfig::default()).await
}

/// Downloads every segment of the playlist at `source` into `dir`, drawing
/// progress with a bar built from `bar_config`.
///
/// Segments are saved under the last component of their URL path, with `.ts`
/// appended when missing. Segments already on disk are counted without being
/// fetched. A segment that fails is logged above the progress line and retried
/// up to `config.retries` times; the remaining segments carry on either way.
///
/// Only setup problems are returned as errors: an invalid proxy, an unusable
/// directory or a playlist that cannot be decoded.
pub async fn download_hls_with(
    source: &str,
    dir: impl AsRef<Path>,
    config: HlsConfig,
    mut bar_config: BarConfig,
) -> Result<HlsReport> {
    let dir = dir.as_ref().to_path_buf();
    let client = create_http_client(client_config(&config)?)?;

    fs::create_dir_all(&dir).await?;
    let segments = decode_playlist(&client, source).await?;
    debug!(segments = segments.len(), "Decoded playlist {}", source);

    let tally = Arc::new(Tally::new(segments.len()));
    if bar_config.segments.is_none() {
        bar_config.segments = Some(vec![
            format::plan(Plan::default()),
            format::rate_size(),
            format::custom_rate_size_unit(tally.bytes.clone(), tally.projected.clone()),
            format::remain(),
        ]);
    }

    let coroutine = Coroutine::new(segments.len(), config.concurrency, bar_config);
    let attempts = config.retries.max(1);
    for url in segments {
        let job = Arc::new(SegmentJob {
            path: segment_path(&dir, &url),
            url,
            client: client.clone(),
            bar: coroutine.bar().clone(),
            tally: tally.clone(),
            show_details: config.show_details,
            attempts,
            tried: AtomicU32::new(0),
        });
        coroutine
            .submit_retry(
                move || {
                    let job = job.clone();
                    async move { job.run().await }
                },
                attempts,
            )
            .await;
    }
    coroutine.wait().await;

    Ok(tally.report())
}

/// Client settings for segment fetches.
///
/// Attempts are counted and logged by the coroutine, so the middleware does
/// not retry on its own.
fn client_config(config: &HlsConfig) -> Result<HttpClientConfig> {
    Ok(HttpClientConfig {
        retries: 0,
        proxy: parse_proxy(config.proxy.as_deref().unwrap_or_default())?,
        headers: None,
        timeout: config.timeout,
    })
}

/// Where a segment is saved inside `dir`.
pub fn segment_path(dir: &Path, url: &Url) -> PathBuf {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("segment");
    let mut name = name.to_string();
    if !name.ends_with(".ts") {
        name.push_str(".ts");
    }
    dir.join(name)
}

/// Running totals shared by the segment jobs and the size segment.
struct Tally {
    segments: u64,
    done: AtomicU64,
    failed: AtomicU64,
    bytes: Arc<AtomicU64>,
    /// Total size extrapolated from the average finished segment.
    projected: Arc<AtomicU64>,
}

impl Tally {
    fn new(segments: usize) -> Self {
        Self {
            segments: segments as u64,
            done: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            bytes: Arc::new(AtomicU64::new(0)),
            projected: Arc::new(AtomicU64::new(0)),
        }
    }

    fn record(&self, size: u64) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let bytes = self.bytes.fetch_add(size, Ordering::SeqCst) + size;
        self.projected
            .store((bytes / done).saturating_mul(self.segments), Ordering::SeqCst);
    }

    fn report(&self) -> HlsReport {
        HlsReport {
            segments: self.segments as usize,
            completed: self.done.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            bytes: self.bytes.load(Ordering::SeqCst),
        }
    }
}

struct SegmentJob {
    url: Url,
    path: PathBuf,
    client: ClientWithMiddleware,
    bar: Bar,
    tally: Arc<Tally>,
    show_details: bool,
    attempts: u32,
    tried: AtomicU32,
}

impl SegmentJob {
    async fn run(&self) -> Result<()> {
        let attempt = self.tried.fetch_add(1, Ordering::SeqCst) + 1;

        match fs::metadata(&self.path).await {
            Ok(meta) => {
                debug!("{:?} already exists", self.path);
                self.tally.record(meta.len());
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.fail(attempt, e.into())),
        }

        match fetch_to_file(&self.client, &self.url, &self.path).await {
            Ok(size) => {
                self.tally.record(size);
                if self.show_details {
                    self.bar.log(&self.url);
                }
                Ok(())
            }
            Err(e) => Err(self.fail(attempt, e)),
        }
    }

    fn fail(&self, attempt: u32, e: Error) -> Error {
        self.bar.log(format_args!(
            "[error] {} (attempt {}/{}): {}",
            self.url,
            attempt,
            self.attempts,
            describe(&e)
        ));
        if attempt >= self.attempts {
            self.tally.failed.fetch_add(1, Ordering::SeqCst);
        }
        e
    }
}

/// The error and its sources on one line.
fn describe(e: &Error) -> String {
    let mut text = e.to_string();
    let mut source = StdError::source(e);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
