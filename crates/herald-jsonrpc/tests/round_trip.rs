//! Encoding a message and decoding it again with the matching decoder
//! must give back the same value, including through the byte codec.

use herald_decode::{any, compose, decode, optional_field, unsigned};
use herald_jsonrpc::{
    batch_request_decoder, call_decoder, client_message_decoder, notification_decoder,
    request_decoder, server_message_decoder, BatchRequest, BatchResponse, Call, ClientMessage,
    Encode, ErrorDetail, ErrorResponse, FrameCodec, Id, JsonCodec, Notification, Reply, Request,
    Response, ServerMessage,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Cursor {
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<u64>,
}

fn cursor_decoder() -> impl herald_decode::Decoder<Output = Cursor> + Copy {
    compose(|s| {
        Ok(Cursor {
            after: s.run(optional_field("after", unsigned()))?,
        })
    })
}

#[test]
fn test_request_round_trip_with_typed_params() {
    for after in [None, Some(0), Some(1_700_000_000_000)] {
        let request = Request::new(1u64, "get_battle_results", Cursor { after });
        let wire = request.to_wire().unwrap();
        assert_eq!(decode(request_decoder(cursor_decoder()), &wire), Ok(request));
    }
}

#[test]
fn test_request_ids_round_trip_exactly() {
    for id in [Id::from(7u64), Id::from(-3i64), Id::from("7"), Id::Null] {
        let request = Request::new(id.clone(), "m", Value::Null);
        let decoded = decode(request_decoder(any()), &request.to_wire().unwrap()).unwrap();
        assert_eq!(decoded.id, id);
    }
}

#[test]
fn test_notification_round_trip() {
    let notification = Notification::new("subscription", json!({ "timestamp": 5 }));
    let wire = notification.to_wire().unwrap();
    let decoder = notification_decoder("subscription", any());
    assert_eq!(decode(&decoder, &wire), Ok(notification));
}

#[test]
fn test_batch_round_trip_through_bytes() {
    let batch = BatchRequest::new(vec![
        Call::Request(Request::new(1u64, "get_battle_results", json!({ "after": 10 }))),
        Call::Request(Request::new(2u64, "subscribe", Value::Null)),
        Call::Notification(Notification::new("hello", json!([1, 2]))),
    ]);

    let codec = JsonCodec;
    let bytes = codec.encode_frame(&batch.to_wire().unwrap()).unwrap();
    let value = codec.decode_frame(&bytes).unwrap();

    let decoded = decode(batch_request_decoder(call_decoder(any())), &value).unwrap();
    assert_eq!(decoded, batch);
}

#[test]
fn test_client_message_round_trip() {
    let messages = [
        ClientMessage::Request(Request::new(1u64, "subscribe", Value::Null)),
        ClientMessage::Notification(Notification::new("bye", Value::Null)),
        ClientMessage::Batch(BatchRequest::new(vec![Call::Request(Request::new(
            "x",
            "m",
            json!({}),
        ))])),
    ];
    for message in messages {
        let wire = message.to_wire().unwrap();
        assert_eq!(decode(client_message_decoder(any()), &wire), Ok(message));
    }
}

#[test]
fn test_server_message_round_trip() {
    let decoder = server_message_decoder(notification_decoder("subscription", any()));
    let messages: Vec<ServerMessage> = vec![
        ServerMessage::Response(Response {
            result: json!({ "start": 0, "end": 10, "battleResults": [] }),
            id: Id::from(1u64),
        }),
        ServerMessage::ErrorResponse(ErrorResponse {
            error: ErrorDetail {
                code: -32601,
                message: "Method not found".into(),
                data: Some(json!("subscribe")),
            },
            id: Id::from(2u64),
        }),
        ServerMessage::BatchRequest(BatchRequest::new(vec![
            Notification::new("subscription", json!({ "timestamp": 3 })),
            Notification::new("subscription", json!({ "timestamp": 4 })),
        ])),
        ServerMessage::BatchResponse(BatchResponse::new(vec![
            Reply::Success(Response {
                result: Value::Null,
                id: Id::from(2u64),
            }),
            Reply::Error(ErrorResponse {
                error: ErrorDetail {
                    code: 1,
                    message: "no".into(),
                    data: None,
                },
                id: Id::from(1u64),
            }),
        ])),
    ];
    for message in messages {
        let wire = message.to_wire().unwrap();
        assert_eq!(decode(&decoder, &wire), Ok(message));
    }
}
