//! Single-file helpers that draw a byte bar.

use crate::bar::{Bar, BarBuilder};
use crate::error::{Error, Result};
use crate::format::{self, Plan};
use crate::http::{create_http_client, fetch_to_file_with, parse_proxy, HttpClientConfig};

use reqwest::Url;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

impl Bar {
    /// Downloads `url` to `path`, advancing the bar by every byte received.
    ///
    /// When the bar has no total yet, the response content length becomes the
    /// total. The bar is closed when the download ends, successful or not.
    pub async fn download(&self, url: &str, path: impl AsRef<Path>, proxy: Option<&str>) -> Result<u64> {
        let result = self.fetch(url, path.as_ref(), proxy).await;
        self.close();
        result
    }

    async fn fetch(&self, url: &str, path: &Path, proxy: Option<&str>) -> Result<u64> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        let client = create_http_client(client_config(proxy)?)?;
        let size = fetch_to_file_with(&client, &url, path, Some(self)).await?;
        self.flush();
        debug!(bytes = size, "Downloaded {} to {:?}", url, path);
        Ok(size)
    }
}

/// Client settings for a single download.
///
/// Nothing retries above this request, so transient failures are retried by
/// the middleware. HLS segments are retried by their coroutine instead and use
/// no middleware retries.
fn client_config(proxy: Option<&str>) -> Result<HttpClientConfig> {
    Ok(HttpClientConfig {
        proxy: parse_proxy(proxy.unwrap_or_default())?,
        ..HttpClientConfig::default()
    })
}

/// Downloads `url` to `path` with a byte bar on stdout.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), linebar::Error> {
/// let bytes = linebar::download::download_file(
///     "https://example.com/archive.zip",
///     "archive.zip",
///     None,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn download_file(url: &str, path: impl AsRef<Path>, proxy: Option<&str>) -> Result<u64> {
    byte_bar(0).download(url, path, proxy).await
}

/// Copies `reader` into `writer` with a byte bar on stdout sized to `total`.
pub fn copy<W, R>(writer: &mut W, reader: R, total: i64) -> io::Result<u64>
where
    W: Write + ?Sized,
    R: Read,
{
    let bar = byte_bar(total);
    let result = bar.copy(writer, reader);
    bar.close();
    result
}

fn byte_bar(total: i64) -> Bar {
    BarBuilder::new()
        .total(total)
        .format(format::default_unit_segments(Plan::default()))
        .build()
}
