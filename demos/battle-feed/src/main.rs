//! Battle feed: connects to a feed server and prints every event.
//!
//! ```text
//! cargo run -p battle-feed -- ws://localhost:15455
//! HERALD_AFTER=1700000000000 RUST_LOG=debug cargo run -p battle-feed
//! ```
//!
//! The URL comes from the first argument, then `HERALD_URL`, then the
//! default config. `HERALD_AFTER` is the cursor for the catch-up request.

use herald::prelude::*;
use herald_decode::any;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), HeraldError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = FeedConfig::default();
    if let Some(url) = std::env::args().nth(1).or_else(|| std::env::var("HERALD_URL").ok()) {
        config.url = url;
    }
    let after = match std::env::var("HERALD_AFTER") {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(after) => Some(after),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "ignoring HERALD_AFTER");
                None
            }
        },
        Err(_) => None,
    };

    let client = FeedClient::builder().config(config).build(any())?;
    let mut feed = client.open(after).await?;

    let mut cursor = after;
    while let Some(event) = feed.next_event().await {
        match event {
            FeedEvent::Subscribed => tracing::info!("live updates on"),
            FeedEvent::BattleResults(results) => {
                for result in &results.battle_results {
                    println!("{result}");
                }
                cursor = Some(results.end);
                tracing::info!(
                    start = results.start,
                    end = results.end,
                    count = results.battle_results.len(),
                    "caught up"
                );
            }
            FeedEvent::Notification {
                timestamp,
                battle_result,
            } => {
                println!("{timestamp} {battle_result}");
                cursor = Some(timestamp);
            }
            FeedEvent::ConnectionClosed => {
                tracing::info!(?cursor, "feed closed; rerun with HERALD_AFTER to resume");
            }
        }
    }

    Ok(())
}
