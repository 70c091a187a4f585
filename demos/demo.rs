//! Example drawing a few bars: a plain loop, a coloured one and a task pool

use color_eyre::Result;
use console::Color;
use linebar::format::{self, Plan};
use linebar::{BarBuilder, Coroutine};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // A counter driven by hand, redrawn after every step.
    let bar = BarBuilder::new()
        .total(50)
        .prefix("count ")
        .auto_flush(true)
        .on_final(|bar| bar.log("counting done"))
        .build();
    for _ in 0..50 {
        bar.add(1);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    // Custom segments, redrawn by a background ticker.
    let bar = BarBuilder::new()
        .total(200)
        .format(vec![
            format::animation_moon(),
            format::plan(Plan::default().width(30).style("=").color(Color::Cyan)),
            format::rate_percent(),
            format::used(),
            format::remain_window(),
        ])
        .flush_interval(Duration::from_millis(100))
        .build();
    for step in 0..200 {
        bar.add(1);
        if step % 50 == 0 {
            bar.log(format_args!("checkpoint {step}"));
        }
        tokio::time::sleep(Duration::from_millis(15)).await;
    }
    bar.flush();

    // Twenty jobs, four at a time.
    let coroutine = Coroutine::new(20, 4, BarBuilder::new().prefix("jobs ").into_config());
    for i in 0..20u64 {
        coroutine
            .submit(move || async move {
                tokio::time::sleep(Duration::from_millis(100 + (i % 5) * 50)).await;
            })
            .await;
    }
    coroutine.wait().await;

    Ok(())
}
