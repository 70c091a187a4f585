//! HTTP module containing the client and the fetch-to-file helper.
//!
//! - [`client`] - Client creation with middleware, proxy parsing and streaming downloads

pub mod client;

pub use client::{
    create_http_client, fetch_to_file, fetch_to_file_with, parse_proxy, partial_path,
    HttpClientConfig, PARTIAL_SUFFIX,
};
