//! Correlation: turning inbound messages into application events.
//!
//! Exactly two requests are ever in flight on a connection, so a response
//! is matched purely by comparing its `id` with the two ids the initial
//! batch was built with. There is no pending-request table.

use herald_jsonrpc::{Id, Response};

use crate::flatten::Inbound;
use crate::protocol::{BattleResults, FeedDecoders, FeedNotification};
use crate::{FeedConfig, HeraldError, ProtocolViolation};

/// What a subscription reports to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent<T> {
    /// The server acknowledged the subscribe request.
    Subscribed,

    /// The server answered the catch-up request.
    BattleResults(BattleResults<T>),

    /// A live battle result.
    Notification { timestamp: f64, battle_result: T },

    /// The subscription ended. Always the last event, produced exactly
    /// once.
    ConnectionClosed,
}

impl<T> FeedEvent<T> {
    /// Returns `true` for [`FeedEvent::ConnectionClosed`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }
}

/// The ids of the two requests one connection sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    catch_up: Id,
    subscribe: Id,
}

impl Correlation {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            catch_up: Id::from(config.catch_up_id),
            subscribe: Id::from(config.subscribe_id),
        }
    }

    /// Maps one flattened message to its event.
    ///
    /// # Errors
    /// - [`ProtocolViolation::ErrorResponse`] for any error response.
    /// - [`ProtocolViolation::UnexpectedResponse`] for an unknown id.
    /// - A decode error if a result has the wrong shape.
    pub fn to_event<T: 'static>(
        &self,
        inbound: Inbound<FeedNotification<T>>,
        decoders: &FeedDecoders<T>,
    ) -> Result<FeedEvent<T>, HeraldError> {
        match inbound {
            Inbound::ErrorResponse(error) => Err(ProtocolViolation::ErrorResponse {
                id: error.id,
                code: error.error.code,
                message: error.error.message,
            }
            .into()),
            Inbound::Response(response) => self.response_to_event(response, decoders),
            Inbound::Notification(notification) => Ok(FeedEvent::Notification {
                timestamp: notification.params.timestamp,
                battle_result: notification.params.battle_result,
            }),
        }
    }

    fn response_to_event<T: 'static>(
        &self,
        response: Response,
        decoders: &FeedDecoders<T>,
    ) -> Result<FeedEvent<T>, HeraldError> {
        if response.id.matches(&self.catch_up) {
            Ok(FeedEvent::BattleResults(
                decoders.battle_results(&response.result)?,
            ))
        } else if response.id.matches(&self.subscribe) {
            decoders.subscribed(&response.result)?;
            Ok(FeedEvent::Subscribed)
        } else {
            Err(ProtocolViolation::UnexpectedResponse { id: response.id }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use herald_decode::any;
    use herald_jsonrpc::{ErrorDetail, ErrorResponse, Notification, ProtocolError};
    use serde_json::{json, Value};

    use super::*;
    use crate::protocol::SubscriptionParams;

    fn setup() -> (Correlation, FeedDecoders<Value>) {
        let config = FeedConfig::default();
        let decoders = FeedDecoders::new(&config.notification_method, any());
        (Correlation::new(&config), decoders)
    }

    fn response(id: impl Into<Id>, result: Value) -> Inbound<FeedNotification<Value>> {
        Inbound::Response(Response {
            result,
            id: id.into(),
        })
    }

    #[test]
    fn test_subscribe_id_yields_subscribed() {
        let (correlation, decoders) = setup();
        let event = correlation.to_event(response(2u64, Value::Null), &decoders).unwrap();
        assert_eq!(event, FeedEvent::Subscribed);
    }

    #[test]
    fn test_catch_up_id_yields_battle_results() {
        let (correlation, decoders) = setup();
        let result = json!({ "start": 0, "end": 10, "battleResults": [] });
        match correlation.to_event(response(1u64, result), &decoders).unwrap() {
            FeedEvent::BattleResults(results) => {
                assert_eq!(results.end, 10.0);
                assert!(results.battle_results.is_empty());
            }
            other => panic!("expected battle results, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_id_is_violation() {
        let (correlation, decoders) = setup();
        let err = correlation.to_event(response(99u64, Value::Null), &decoders).unwrap_err();
        assert!(matches!(
            err,
            HeraldError::Violation(ProtocolViolation::UnexpectedResponse { id }) if id == Id::from(99u64)
        ));
    }

    #[test]
    fn test_integral_float_id_matches_subscribe() {
        let (correlation, decoders) = setup();
        let id: Id = serde_json::from_value(json!(2.0)).unwrap();
        let event = correlation.to_event(response(id, Value::Null), &decoders).unwrap();
        assert_eq!(event, FeedEvent::Subscribed);
    }

    #[test]
    fn test_string_id_does_not_match_number_id() {
        let (correlation, decoders) = setup();
        let err = correlation.to_event(response("2", Value::Null), &decoders).unwrap_err();
        assert!(matches!(err, HeraldError::Violation(_)));
    }

    #[test]
    fn test_error_response_is_violation() {
        let (correlation, decoders) = setup();
        let inbound = Inbound::ErrorResponse(ErrorResponse {
            error: ErrorDetail {
                code: -32601,
                message: "Method not found".into(),
                data: None,
            },
            id: Id::from(1u64),
        });
        let err = correlation.to_event(inbound, &decoders).unwrap_err();
        assert!(matches!(
            err,
            HeraldError::Violation(ProtocolViolation::ErrorResponse { code: -32601, .. })
        ));
    }

    #[test]
    fn test_non_null_subscribe_result_is_decode_error() {
        let (correlation, decoders) = setup();
        let err = correlation.to_event(response(2u64, json!("ok")), &decoders).unwrap_err();
        assert!(matches!(err, HeraldError::Protocol(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_notification_maps_directly() {
        let (correlation, decoders) = setup();
        let inbound = Inbound::Notification(Notification::new(
            "subscription",
            SubscriptionParams {
                timestamp: 7.0,
                battle_result: json!({ "winner": "blue" }),
            },
        ));
        assert_eq!(
            correlation.to_event(inbound, &decoders).unwrap(),
            FeedEvent::Notification {
                timestamp: 7.0,
                battle_result: json!({ "winner": "blue" }),
            }
        );
    }
}
