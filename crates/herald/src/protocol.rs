//! The battle-result feed protocol on top of JSON-RPC.
//!
//! A client opens a feed with one batch of two requests:
//!
//! ```text
//! → [ {"method":"get_battle_results","params":{"after":<cursor>},"id":1},
//!     {"method":"subscribe","params":null,"id":2} ]
//! ```
//!
//! The server answers the catch-up request with
//! `{ start, end, battleResults: [T] }`, the subscribe request with `null`,
//! and from then on pushes `subscription` notifications carrying
//! `{ timestamp, battleResult: T }`.
//!
//! The item type `T` is whatever the caller's item decoder produces. This
//! module never looks inside a battle result.

use std::sync::Arc;

use herald_decode::{
    array, compose, decode, field, null, number, DecodeError, Decoder, OneOf, SharedDecoder,
};
use herald_jsonrpc::{
    notification_decoder, server_message_decoder, BatchRequest, Call, Notification,
    ProtocolError, Request, ServerMessage,
};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::FeedConfig;

/// Params of the catch-up request. `after` is left out entirely when
/// there is no cursor.
///
/// Timestamps are JSON numbers. A whole cursor goes out as an integer
/// (`1700`, not `1700.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GetBattleResultsParams {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "cursor")]
    pub after: Option<f64>,
}

fn cursor<S: Serializer>(after: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *after {
        Some(t) if t.fract() == 0.0 && t.abs() < 9_007_199_254_740_992.0 => {
            serializer.serialize_i64(t as i64)
        }
        Some(t) => serializer.serialize_f64(t),
        None => serializer.serialize_none(),
    }
}

/// Result of the catch-up request.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleResults<T> {
    pub start: f64,
    pub end: f64,
    pub battle_results: Vec<T>,
}

/// Params of a `subscription` notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionParams<T> {
    pub timestamp: f64,
    pub battle_result: T,
}

/// A decoded `subscription` notification.
pub type FeedNotification<T> = Notification<SubscriptionParams<T>>;

/// Any message the feed server may send.
pub type FeedMessage<T> = ServerMessage<FeedNotification<T>>;

/// Builds the batch sent as soon as the channel is open.
///
/// # Errors
/// Returns [`ProtocolError::Encode`] if the params cannot be serialized.
pub fn initial_batch(config: &FeedConfig, after: Option<f64>) -> Result<BatchRequest, ProtocolError> {
    let catch_up = serde_json::to_value(GetBattleResultsParams { after })
        .map_err(ProtocolError::Encode)?;
    Ok(BatchRequest::new(vec![
        Call::Request(Request::new(
            config.catch_up_id,
            config.catch_up_method.as_str(),
            catch_up,
        )),
        Call::Request(Request::new(
            config.subscribe_id,
            config.subscribe_method.as_str(),
            Value::Null,
        )),
    ]))
}

/// Decodes the catch-up result, using `item` for every battle result.
pub fn battle_results_decoder<D: Decoder>(item: D) -> impl Decoder<Output = BattleResults<D::Output>> {
    compose(move |s| {
        Ok(BattleResults {
            start: s.run(field("start", number()))?,
            end: s.run(field("end", number()))?,
            battle_results: s.run(field("battleResults", array(&item)))?,
        })
    })
}

/// Decodes the params of a `subscription` notification.
pub fn subscription_params_decoder<D: Decoder>(
    item: D,
) -> impl Decoder<Output = SubscriptionParams<D::Output>> {
    compose(move |s| {
        Ok(SubscriptionParams {
            timestamp: s.run(field("timestamp", number()))?,
            battle_result: s.run(field("battleResult", &item))?,
        })
    })
}

/// The decoders one feed client needs, built once and shared by every
/// subscription it opens.
pub struct FeedDecoders<T> {
    message: OneOf<'static, FeedMessage<T>>,
    battle_results: SharedDecoder<BattleResults<T>>,
}

impl<T: 'static> FeedDecoders<T> {
    /// Builds the decoders for notifications named `notification_method`,
    /// decoding each battle result with `item`.
    pub fn new<D>(notification_method: &str, item: D) -> Self
    where
        D: Decoder<Output = T> + Send + Sync + 'static,
    {
        let item = Arc::new(item);
        let params = subscription_params_decoder(Arc::clone(&item));
        Self {
            message: server_message_decoder(notification_decoder(
                notification_method.to_owned(),
                params,
            )),
            battle_results: battle_results_decoder(item).shared(),
        }
    }

    /// Decodes one inbound frame.
    pub fn message(&self, value: &Value) -> Result<FeedMessage<T>, DecodeError> {
        decode(&self.message, value)
    }

    /// Decodes the result of the catch-up request.
    pub fn battle_results(&self, result: &Value) -> Result<BattleResults<T>, DecodeError> {
        decode(&self.battle_results, result)
    }

    /// Checks the result of the subscribe request, which must be `null`.
    pub fn subscribed(&self, result: &Value) -> Result<(), DecodeError> {
        decode(null(), result)
    }
}
