//! Example downloading an HLS stream
//!
//! ```text
//! cargo run --example hls -- <playlist-url-or-path> [output-dir] [proxy]
//! ```

use color_eyre::eyre::eyre;
use color_eyre::Result;
use linebar::hls::{download_hls, HlsConfigBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .ok_or_else(|| eyre!("usage: hls <playlist-url-or-path> [output-dir] [proxy]"))?;
    let dir = args.next().unwrap_or_else(|| "video".into());

    let mut builder = HlsConfigBuilder::new().concurrency(8).retries(3);
    if let Some(proxy) = args.next() {
        builder = builder.proxy(proxy);
    }

    let report = download_hls(&source, &dir, builder.build()).await?;
    println!(
        "{}/{} segments saved to {} ({} failed, {})",
        report.completed,
        report.segments,
        dir,
        report.failed,
        linebar::utils::size_string(report.bytes as i64),
    );

    Ok(())
}
