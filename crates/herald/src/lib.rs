//! # Herald
//!
//! Client for a JSON-RPC 2.0 feed of battle results.
//!
//! Opening a feed sends one batch with a catch-up request (everything
//! after a cursor) and a subscribe request. The replies and the live
//! notifications that follow are decoded, correlated by request id and
//! delivered as [`FeedEvent`]s. The stream always ends with exactly one
//! [`FeedEvent::ConnectionClosed`]; reconnecting means calling
//! [`FeedClient::open`] again.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use herald::prelude::*;
//! use herald_decode::any;
//!
//! # async fn run() -> Result<(), HeraldError> {
//! let client = FeedClient::builder().build(any())?;
//! let mut feed = client.open(Some(1_700_000_000_000.0)).await?;
//! while let Some(event) = feed.next_event().await {
//!     if let FeedEvent::Notification { timestamp, battle_result } = event {
//!         println!("{timestamp}: {battle_result}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The item type is whatever the decoder passed to
//! [`build`](FeedClientBuilder::build) produces; this crate never looks
//! inside a battle result.

mod client;
mod config;
mod error;
mod events;
mod flatten;
mod protocol;
mod subscription;

pub use client::{FeedClient, FeedClientBuilder};
pub use config::{ConnectionState, FeedConfig};
pub use error::{HeraldError, ProtocolViolation};
pub use events::{Correlation, FeedEvent};
pub use flatten::{flatten, Inbound};
pub use protocol::{
    battle_results_decoder, initial_batch, subscription_params_decoder, BattleResults,
    FeedDecoders, FeedMessage, FeedNotification, GetBattleResultsParams, SubscriptionParams,
};
pub use subscription::Subscription;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::{
        BattleResults, ConnectionState, FeedClient, FeedClientBuilder, FeedConfig, FeedEvent,
        HeraldError, ProtocolViolation, Subscription,
    };
}
