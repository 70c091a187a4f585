//! HTTP client setup and the fetch-to-file helper.
//!
//! The client is a reqwest client wrapped in middleware:
//!
//! - **Tracing**: request/response spans through `reqwest-tracing`
//! - **Retry**: exponential backoff for transient failures
//! - **Proxy**: optional `http`, `https` or `socks5` proxy
//! - **Timeout**: optional whole-request timeout, none by default since
//!   large downloads can legitimately take a long time
//!
//! # Examples
//!
//! ```rust
//! use linebar::http::{create_http_client, parse_proxy, HttpClientConfig};
//!
//! # fn example() -> Result<(), linebar::Error> {
//! let config = HttpClientConfig {
//!     proxy: parse_proxy("socks5://127.0.0.1:1080")?,
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use crate::bar::Bar;
use crate::error::{Error, Result};

use futures::StreamExt;
use reqwest::{header::HeaderMap, Proxy, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

/// Suffix of the file a download is streamed into before it is renamed.
pub const PARTIAL_SUFFIX: &str = ".downloading";

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of retries for transient failures.
    pub retries: u32,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Whole-request timeout. `None` never times out.
    pub timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            proxy: None,
            headers: None,
            timeout: None,
        }
    }
}

/// Parses a proxy URL.
///
/// An empty string means no proxy. Anything that is not an `http`, `https`,
/// `socks5` or `socks5h` URL is rejected.
pub fn parse_proxy(url: &str) -> Result<Option<Proxy>> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: String| Error::InvalidProxy {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "socks5" | "socks5h" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }

    Proxy::all(parsed.as_str())
        .map(Some)
        .map_err(|e| invalid(e.to_string()))
}

/// Creates an HTTP client with middleware configuration.
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);

    let mut inner_client_builder = reqwest::Client::builder();
    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }
    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }
    if let Some(timeout) = config.timeout {
        inner_client_builder = inner_client_builder.timeout(timeout);
    }
    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        // Retry failed requests.
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    Ok(client)
}

/// Path of the partial file for `path`, e.g. `a.ts.downloading`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Downloads `url` to `path` and returns the number of bytes written.
///
/// The body is streamed into [`partial_path`] and renamed to `path` only once
/// complete, so `path` never holds a truncated file. The partial file is
/// removed on failure.
pub async fn fetch_to_file(client: &ClientWithMiddleware, url: &Url, path: &Path) -> Result<u64> {
    fetch_to_file_with(client, url, path, None).await
}

/// Like [`fetch_to_file`], advancing `bar` by every chunk written.
///
/// When the bar has no total yet, the response content length becomes its
/// total.
pub async fn fetch_to_file_with(
    client: &ClientWithMiddleware,
    url: &Url,
    path: &Path,
    bar: Option<&Bar>,
) -> Result<u64> {
    let partial = partial_path(path);
    let result = stream_to(client, url, path, &partial, bar).await;
    if result.is_err() {
        if let Err(e) = fs::remove_file(&partial).await {
            debug!(path = ?partial, error = %e, "no partial file to remove");
        }
    }
    result
}

async fn stream_to(
    client: &ClientWithMiddleware,
    url: &Url,
    path: &Path,
    partial: &Path,
    bar: Option<&Bar>,
) -> Result<u64> {
    debug!("Fetching {}", url);
    let res = client.get(url.as_str()).send().await?.error_for_status()?;

    if let (Some(bar), Some(length)) = (bar, res.content_length()) {
        if bar.total() <= 0 {
            bar.set_total(i64::try_from(length).unwrap_or(i64::MAX));
        }
    }

    if let Some(parent) = path.parent() {
        debug!("Creating destination directory {:?}", parent);
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(partial).await?;
    let mut written: u64 = 0;
    let mut stream = res.bytes_stream();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        if let Some(bar) = bar {
            bar.add(chunk.len() as i64);
            bar.flush();
        }
    }
    file.flush().await?;
    drop(file);

    fs::rename(partial, path).await?;
    debug!(bytes = written, "Saved {:?}", path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, USER_AGENT};

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.retries, 3);
        assert!(config.proxy.is_none());
        assert!(config.headers.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_create_http_client_with_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("test-agent"));

        let config = HttpClientConfig {
            retries: 5,
            headers: Some(headers),
            timeout: Some(Duration::from_secs(5)),
            ..HttpClientConfig::default()
        };

        assert!(create_http_client(config).is_ok());
    }

    #[test]
    fn test_parse_proxy() {
        assert!(parse_proxy("").unwrap().is_none());
        assert!(parse_proxy("http://127.0.0.1:8080").unwrap().is_some());
        assert!(parse_proxy("socks5://127.0.0.1:1080").unwrap().is_some());
        assert!(matches!(
            parse_proxy("ftp://127.0.0.1"),
            Err(Error::InvalidProxy { .. })
        ));
        assert!(matches!(
            parse_proxy("not a url"),
            Err(Error::InvalidProxy { .. })
        ));
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("out/seg1.ts")),
            PathBuf::from("out/seg1.ts.downloading")
        );
    }
}
