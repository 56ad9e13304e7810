//! Decoders for every JSON-RPC shape, built from `herald-decode`.
//!
//! The envelopes look alike on the wire (a response and an error response
//! both have `id`; a notification and a request differ only by `id`), so
//! each decoder also checks what must *not* be there. That is what makes
//! the fixed alternative order in [`server_message_decoder`] safe.

use std::sync::{Arc, LazyLock};

use herald_decode::{
    any, array, compose, fail, field, from_fn, integer, literal, null, one_of, optional_field,
    string, DecodeError, Decoder, OneOf, Path,
};
use serde_json::{Number, Value};

use crate::{
    BatchRequest, BatchResponse, Call, ClientMessage, ErrorDetail, ErrorResponse, Id,
    Notification, Reply, Request, Response, ServerMessage, JSONRPC_VERSION,
};

/// Checks `"jsonrpc": "2.0"`.
pub fn version_decoder() -> impl Decoder<Output = ()> + Clone {
    field("jsonrpc", literal(JSONRPC_VERSION)).map(|_| ())
}

fn json_number() -> impl Decoder<Output = Number> + Copy {
    from_fn(|value: &Value, path: &Path<'_>| match value {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(DecodeError::new(path, format!("Expected {path} to be a number."))),
    })
}

/// The value of an `id` property, built on first use and shared by every
/// envelope decoder.
static ID_VALUE: LazyLock<OneOf<'static, Id>> = LazyLock::new(|| {
    one_of![
        string().map(Id::String),
        json_number().map(Id::Number),
        null().map(|()| Id::Null),
    ]
});

/// Decodes the `id` property: a string, a number or `null`, with no
/// conversion between them.
pub fn id_decoder() -> impl Decoder<Output = Id> + Clone {
    field("id", &*ID_VALUE)
}

/// Asserts that property `key` is absent. `message` becomes the failure
/// reason when it is present.
fn absent(key: &'static str, message: &'static str) -> impl Decoder<Output = ()> + Clone {
    optional_field(key, fail::<()>(message)).map(|_| ())
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Decodes a notification whose `method` equals `method`, with `params`
/// decoded by `params`.
///
/// A notification that carries an `id` property is rejected, even when the
/// id is `null`.
pub fn notification_decoder<D>(
    method: impl Into<String>,
    params: D,
) -> impl Decoder<Output = Notification<D::Output>>
where
    D: Decoder,
{
    let method = method.into();
    compose(move |s| {
        s.run(version_decoder())?;
        s.run(absent("id", "Notifications must not have an id."))?;
        s.run(field("method", literal(method.as_str())))?;
        Ok(Notification {
            method: method.clone(),
            params: s.run(field("params", &params))?,
        })
    })
}

/// Decodes a success response. `result` is kept as a raw value.
///
/// Fails if an `error` property is present.
pub fn response_decoder() -> impl Decoder<Output = Response> + Copy {
    compose(|s| {
        s.run(version_decoder())?;
        s.run(absent("error", "Response must not have an error."))?;
        Ok(Response {
            result: s.run(field("result", any()))?,
            id: s.run(id_decoder())?,
        })
    })
}

/// Decodes the `{ code, message, data? }` object of an error response.
///
/// `code` may arrive as an integral float (`-32000.0`).
pub fn error_detail_decoder() -> impl Decoder<Output = ErrorDetail> + Copy {
    compose(|s| {
        Ok(ErrorDetail {
            code: s.run(field("code", integer()))?,
            message: s.run(field("message", string()))?,
            data: s.run(optional_field("data", any()))?,
        })
    })
}

/// Decodes an error response.
///
/// Fails if a `result` property is present.
pub fn error_response_decoder() -> impl Decoder<Output = ErrorResponse> + Copy {
    compose(|s| {
        s.run(version_decoder())?;
        s.run(absent("result", "Error Response must not have a result."))?;
        Ok(ErrorResponse {
            error: s.run(field("error", error_detail_decoder()))?,
            id: s.run(id_decoder())?,
        })
    })
}

/// Decodes an array of success and error responses, trying the error
/// shape first for each element.
pub fn batch_response_decoder() -> impl Decoder<Output = BatchResponse> {
    array(one_of![
        error_response_decoder().map(Reply::Error),
        response_decoder().map(Reply::Success),
    ])
    .map(BatchResponse::new)
}

/// Decodes an array whose elements are all decoded by `inner`.
pub fn batch_request_decoder<D: Decoder>(inner: D) -> impl Decoder<Output = BatchRequest<D::Output>> {
    array(inner).map(BatchRequest::new)
}

/// Decodes any message a server may send.
///
/// The alternatives are tried in this order, and the first success wins:
///
/// 1. error response
/// 2. response
/// 3. notification (decoded by `notification`)
/// 4. batch response
/// 5. batch of notifications
///
/// A frame that carries both `result` and `error` matches none of them,
/// and the error lists why each alternative was rejected.
pub fn server_message_decoder<D>(notification: D) -> OneOf<'static, ServerMessage<D::Output>>
where
    D: Decoder + Send + Sync + 'static,
    D::Output: 'static,
{
    let notification = Arc::new(notification);
    one_of![
        error_response_decoder().map(ServerMessage::ErrorResponse),
        response_decoder().map(ServerMessage::Response),
        Arc::clone(&notification).map(ServerMessage::Notification),
        batch_response_decoder().map(ServerMessage::BatchResponse),
        batch_request_decoder(notification).map(ServerMessage::BatchRequest),
    ]
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------
//
// A client never needs these; they exist so servers, proxies and tests can
// read what a client sends with the same guarantees.

/// Decodes a request with any method name.
pub fn request_decoder<D: Decoder>(params: D) -> impl Decoder<Output = Request<D::Output>> {
    compose(move |s| {
        s.run(version_decoder())?;
        Ok(Request {
            method: s.run(field("method", string()))?,
            params: s.run(field("params", &params))?,
            id: s.run(id_decoder())?,
        })
    })
}

/// Decodes a notification with any method name.
pub fn any_notification_decoder<D: Decoder>(
    params: D,
) -> impl Decoder<Output = Notification<D::Output>> {
    compose(move |s| {
        s.run(version_decoder())?;
        s.run(absent("id", "Notifications must not have an id."))?;
        Ok(Notification {
            method: s.run(field("method", string()))?,
            params: s.run(field("params", &params))?,
        })
    })
}

/// Decodes one batch element: a request, or failing that a notification.
pub fn call_decoder<D>(params: D) -> OneOf<'static, Call<D::Output>>
where
    D: Decoder + Send + Sync + 'static,
    D::Output: 'static,
{
    let params = Arc::new(params);
    one_of![
        request_decoder(Arc::clone(&params)).map(Call::Request),
        any_notification_decoder(params).map(Call::Notification),
    ]
}

/// Decodes any message a client may send.
pub fn client_message_decoder<D>(params: D) -> OneOf<'static, ClientMessage<D::Output>>
where
    D: Decoder + Send + Sync + 'static,
    D::Output: 'static,
{
    let params = Arc::new(params);
    one_of![
        request_decoder(Arc::clone(&params)).map(ClientMessage::Request),
        any_notification_decoder(Arc::clone(&params)).map(ClientMessage::Notification),
        batch_request_decoder(call_decoder(params)).map(ClientMessage::Batch),
    ]
}

#[cfg(test)]
mod tests {
    use herald_decode::{decode, number};
    use serde_json::json;

    use super::*;

    // =====================================================================
    // Version and id
    // =====================================================================

    #[test]
    fn test_version_must_be_exactly_2_0() {
        assert!(decode(version_decoder(), &json!({ "jsonrpc": "2.0" })).is_ok());
        for bad in [json!("1.0"), json!(2.0), json!(null)] {
            let err = decode(version_decoder(), &json!({ "jsonrpc": bad })).unwrap_err();
            assert_eq!(err.path(), "$.jsonrpc");
        }
        let err = decode(version_decoder(), &json!({})).unwrap_err();
        assert_eq!(err.path(), "$.jsonrpc");
    }

    #[test]
    fn test_id_keeps_its_type() {
        assert_eq!(decode(id_decoder(), &json!({ "id": 1 })), Ok(Id::from(1u64)));
        assert_eq!(decode(id_decoder(), &json!({ "id": "1" })), Ok(Id::from("1")));
        assert_eq!(decode(id_decoder(), &json!({ "id": null })), Ok(Id::Null));
    }

    #[test]
    fn test_id_rejects_other_types() {
        let err = decode(id_decoder(), &json!({ "id": [1] })).unwrap_err();
        assert_eq!(err.path(), "$.id");
        assert_eq!(err.alternatives().len(), 3);
    }

    // =====================================================================
    // Response / ErrorResponse
    // =====================================================================

    #[test]
    fn test_response_decodes_result_and_id() {
        let value = json!({ "jsonrpc": "2.0", "result": { "a": 1 }, "id": 5 });
        assert_eq!(
            decode(response_decoder(), &value),
            Ok(Response {
                result: json!({ "a": 1 }),
                id: Id::from(5u64),
            })
        );
    }

    #[test]
    fn test_response_missing_result_path_is_precise() {
        let err = decode(response_decoder(), &json!({ "jsonrpc": "2.0", "id": 1 })).unwrap_err();
        assert_eq!(err.path(), "$.result");
    }

    #[test]
    fn test_response_null_result_is_still_a_result() {
        let value = json!({ "jsonrpc": "2.0", "result": null, "id": 2 });
        let response = decode(response_decoder(), &value).unwrap();
        assert_eq!(response.result, Value::Null);
    }

    #[test]
    fn test_response_rejects_error_property() {
        let value = json!({ "jsonrpc": "2.0", "result": 1, "error": {}, "id": 1 });
        let err = decode(response_decoder(), &value).unwrap_err();
        assert_eq!(err.path(), "$.error");
        assert_eq!(
            err.reason(),
            "Expectation failed at $.error: Response must not have an error."
        );
    }

    #[test]
    fn test_error_response_decodes_detail() {
        let value = json!({
            "jsonrpc": "2.0",
            "error": { "code": -32601, "message": "Method not found", "data": [1] },
            "id": "x"
        });
        assert_eq!(
            decode(error_response_decoder(), &value),
            Ok(ErrorResponse {
                error: ErrorDetail {
                    code: -32601,
                    message: "Method not found".into(),
                    data: Some(json!([1])),
                },
                id: Id::from("x"),
            })
        );
    }

    #[test]
    fn test_error_response_data_is_optional() {
        let value = json!({
            "jsonrpc": "2.0",
            "error": { "code": 1, "message": "m" },
            "id": null
        });
        let decoded = decode(error_response_decoder(), &value).unwrap();
        assert_eq!(decoded.error.data, None);
    }

    #[test]
    fn test_error_response_rejects_result_property() {
        let value = json!({
            "jsonrpc": "2.0",
            "result": 1,
            "error": { "code": 1, "message": "m" },
            "id": 1
        });
        let err = decode(error_response_decoder(), &value).unwrap_err();
        assert_eq!(err.path(), "$.result");
    }

    #[test]
    fn test_error_code_must_be_number() {
        let value = json!({
            "jsonrpc": "2.0",
            "error": { "code": "bad", "message": "m" },
            "id": 1
        });
        let err = decode(error_response_decoder(), &value).unwrap_err();
        assert_eq!(err.path(), "$.error.code");
    }

    #[test]
    fn test_error_code_accepts_integral_float() {
        let value = json!({
            "jsonrpc": "2.0",
            "error": { "code": -32000.0, "message": "x" },
            "id": 1
        });
        let decoded = decode(error_response_decoder(), &value).unwrap();
        assert_eq!(decoded.error.code, -32000);

        let message = server_message_decoder(notification_decoder("subscription", number()));
        assert!(matches!(
            decode(&message, &value),
            Ok(ServerMessage::ErrorResponse(_))
        ));
    }

    #[test]
    fn test_error_code_rejects_fraction() {
        let value = json!({
            "jsonrpc": "2.0",
            "error": { "code": -1.5, "message": "x" },
            "id": 1
        });
        let err = decode(error_response_decoder(), &value).unwrap_err();
        assert_eq!(err.path(), "$.error.code");
    }

    #[test]
    fn test_id_decoder_is_reusable() {
        let decoder = id_decoder();
        for _ in 0..3 {
            assert_eq!(decode(&decoder, &json!({ "id": 2 })), Ok(Id::from(2u64)));
        }
        assert_eq!(decode(id_decoder(), &json!({ "id": "a" })), Ok(Id::from("a")));
    }

    // =====================================================================
    // Notification
    // =====================================================================

    #[test]
    fn test_notification_checks_method_literal() {
        let decoder = notification_decoder("tick", number());
        let ok = json!({ "jsonrpc": "2.0", "method": "tick", "params": 3 });
        assert_eq!(decode(&decoder, &ok), Ok(Notification::new("tick", 3.0)));

        let other = json!({ "jsonrpc": "2.0", "method": "tock", "params": 3 });
        let err = decode(&decoder, &other).unwrap_err();
        assert_eq!(err.path(), "$.method");
    }

    #[test]
    fn test_notification_with_id_is_rejected() {
        let decoder = notification_decoder("tick", any());
        for id in [json!(1), json!(null)] {
            let value = json!({ "jsonrpc": "2.0", "method": "tick", "params": null, "id": id });
            let err = decode(&decoder, &value).unwrap_err();
            assert_eq!(err.path(), "$.id");
        }
    }

    #[test]
    fn test_notification_params_error_path() {
        let decoder = notification_decoder("tick", field("n", number()));
        let value = json!({ "jsonrpc": "2.0", "method": "tick", "params": { "n": "x" } });
        let err = decode(&decoder, &value).unwrap_err();
        assert_eq!(err.path(), "$.params.n");
    }

    // =====================================================================
    // Server message alternatives
    // =====================================================================

    fn server() -> OneOf<'static, ServerMessage<Notification<Value>>> {
        server_message_decoder(notification_decoder("subscription", any()))
    }

    #[test]
    fn test_server_message_picks_each_shape() {
        let response = json!({ "jsonrpc": "2.0", "result": 1, "id": 1 });
        assert!(matches!(
            decode(server(), &response),
            Ok(ServerMessage::Response(_))
        ));

        let error = json!({ "jsonrpc": "2.0", "error": { "code": 1, "message": "m" }, "id": 1 });
        assert!(matches!(
            decode(server(), &error),
            Ok(ServerMessage::ErrorResponse(_))
        ));

        let notification = json!({ "jsonrpc": "2.0", "method": "subscription", "params": {} });
        assert!(matches!(
            decode(server(), &notification),
            Ok(ServerMessage::Notification(_))
        ));

        let batch = json!([response, error]);
        match decode(server(), &batch) {
            Ok(ServerMessage::BatchResponse(batch)) => {
                assert!(matches!(batch.responses[0], Reply::Success(_)));
                assert!(matches!(batch.responses[1], Reply::Error(_)));
            }
            other => panic!("expected BatchResponse, got {other:?}"),
        }

        let pushed = json!([notification, notification]);
        match decode(server(), &pushed) {
            Ok(ServerMessage::BatchRequest(batch)) => assert_eq!(batch.requests.len(), 2),
            other => panic!("expected BatchRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_result_and_error_together_fail_every_branch() {
        let value = json!({
            "jsonrpc": "2.0",
            "result": 1,
            "error": { "code": 1, "message": "m" },
            "id": 1
        });
        let err = decode(server(), &value).unwrap_err();

        assert!(err.is_aggregate());
        assert_eq!(err.alternatives().len(), 5);
        assert_eq!(err.alternatives()[0].path(), "$.result");
        assert_eq!(err.alternatives()[1].path(), "$.error");
    }

    #[test]
    fn test_wrong_version_fails_every_branch() {
        let value = json!({ "jsonrpc": "1.0", "result": 1, "id": 1 });
        let err = decode(server(), &value).unwrap_err();
        assert!(err.is_aggregate());
        assert_eq!(err.alternatives()[1].path(), "$.jsonrpc");
    }

    #[test]
    fn test_batch_element_failure_is_indexed() {
        let value = json!([
            { "jsonrpc": "2.0", "result": 1, "id": 1 },
            { "jsonrpc": "1.0", "result": 1, "id": 2 }
        ]);
        let err = decode(batch_response_decoder(), &value).unwrap_err();
        assert_eq!(err.path(), "$[1]");
    }

    #[test]
    fn test_batch_request_preserves_order() {
        let a = json!({ "jsonrpc": "2.0", "method": "subscription", "params": "a" });
        let b = json!({ "jsonrpc": "2.0", "method": "subscription", "params": "b" });
        let decoder = batch_request_decoder(notification_decoder("subscription", string()));
        let batch = decode(&decoder, &json!([a, b, a])).unwrap();
        let params: Vec<_> = batch.requests.iter().map(|n| n.params.as_str()).collect();
        assert_eq!(params, ["a", "b", "a"]);
    }

    // =====================================================================
    // Client side
    // =====================================================================

    #[test]
    fn test_call_prefers_request_when_id_present() {
        let request = json!({ "jsonrpc": "2.0", "method": "m", "params": null, "id": 3 });
        assert!(matches!(
            decode(call_decoder(any()), &request),
            Ok(Call::Request(_))
        ));

        let notification = json!({ "jsonrpc": "2.0", "method": "m", "params": null });
        assert!(matches!(
            decode(call_decoder(any()), &notification),
            Ok(Call::Notification(_))
        ));
    }

    #[test]
    fn test_client_message_batch() {
        let value = json!([
            { "jsonrpc": "2.0", "method": "a", "params": 1, "id": 1 },
            { "jsonrpc": "2.0", "method": "b", "params": 2 }
        ]);
        match decode(client_message_decoder(any()), &value) {
            Ok(ClientMessage::Batch(batch)) => assert_eq!(batch.requests.len(), 2),
            other => panic!("expected Batch, got {other:?}"),
        }
    }
}
