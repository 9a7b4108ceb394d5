//! # Ticker demo
//!
//! Publishes a few klines to two subscribers, then cancels one of them and
//! keeps publishing. Events are logged through [`LogWriter`] + `tracing_subscriber`.
//!
//! ## Run
//! ```bash
//! RUST_LOG=klinecast=debug cargo run --example ticker
//! ```

use std::sync::Arc;
use std::time::Duration;

use klinecast::{Broadcast, Config, LogWriter, Subscription};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn consume(name: &'static str, mut sub: Subscription) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(m) = sub.recv().await {
            println!("[{name}] {m}");
        }
        println!("[{name}] subscription closed");
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("klinecast=info")),
        )
        .init();

    let cfg = Config::default().with_deliver_timeout(Duration::from_millis(20));
    let broadcast = Broadcast::builder(cfg)
        .with_observer(Arc::new(LogWriter::new()))
        .try_build()?;

    let stop = CancellationToken::new();
    let dispatch = broadcast.spawn(stop.clone());

    let chart = CancellationToken::new();
    let alerts = CancellationToken::new();
    let chart_task = consume("chart", broadcast.subscribe(chart.clone(), "chart").await);
    let alerts_task = consume("alerts", broadcast.subscribe(alerts.clone(), "alerts").await);

    let start = 1_700_000_000;
    for i in 0..6 {
        let confirm = i % 2 == 1;
        broadcast
            .publish("BTCUSDT", "1", start + (i / 2) * 60, confirm)
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        if i == 2 {
            println!("-- cancelling chart --");
            chart.cancel();
        }
    }

    println!("subscribers left: {:?}", broadcast.keys().await);

    alerts.cancel();
    broadcast.publish("BTCUSDT", "1", start + 180, false).await;
    chart_task.await?;
    alerts_task.await?;

    stop.cancel();
    dispatch.await??;
    Ok(())
}
