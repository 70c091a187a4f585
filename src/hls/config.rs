//! Configuration for HLS downloads.

use std::time::Duration;

/// Options for [`download_hls`](super::download_hls).
#[derive(Debug, Clone)]
pub struct HlsConfig {
    /// Proxy URL (`http`, `https` or `socks5`). Empty or `None` disables it.
    pub proxy: Option<String>,
    /// Number of segments fetched at once.
    pub concurrency: usize,
    /// Attempts per segment.
    pub retries: u32,
    /// Log every finished segment above the progress line.
    pub show_details: bool,
    /// Per-request timeout. `None` never times out.
    pub timeout: Option<Duration>,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            concurrency: 10,
            retries: 3,
            show_details: false,
            timeout: None,
        }
    }
}

/// A builder used to create an [`HlsConfig`].
///
/// ```rust
/// use linebar::hls::HlsConfigBuilder;
///
/// let config = HlsConfigBuilder::new()
///     .proxy("socks5://127.0.0.1:1080")
///     .concurrency(4)
///     .show_details(true)
///     .build();
/// assert_eq!(config.concurrency, 4);
/// ```
#[derive(Debug, Default)]
pub struct HlsConfigBuilder {
    config: HlsConfig,
}

impl HlsConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    pub fn show_details(mut self, show_details: bool) -> Self {
        self.config.show_details = show_details;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> HlsConfig {
        self.config
    }
}
