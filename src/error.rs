//! Error handling for linebar.
//!
//! The progress bar itself never fails: degenerate arithmetic has defined
//! fallbacks and sink write errors are only traced. The variants below come
//! from the download helpers built on top of it.

use std::io;
use thiserror::Error;

/// Errors that can happen when using linebar.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The proxy URL could not be turned into a usable proxy.
    ///
    /// Supported schemes are `http`, `https` and `socks5`.
    #[error("Invalid proxy '{url}': {reason}")]
    InvalidProxy { url: String, reason: String },

    /// The HLS playlist could not be decoded.
    #[error("Invalid playlist: {0}")]
    Playlist(String),

    /// I/O Error.
    ///
    /// Wraps standard I/O errors from creating, writing or renaming files.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the middleware stack wrapped around the HTTP client.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

/// Result type alias for operations that can fail with a linebar error.
pub type Result<T> = std::result::Result<T, Error>;
