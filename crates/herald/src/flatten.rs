//! Flattening: one inbound frame → the single messages it carries.

use herald_jsonrpc::{ErrorResponse, Reply, Response, ServerMessage};

/// One message taken out of an inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound<N> {
    Response(Response),
    ErrorResponse(ErrorResponse),
    Notification(N),
}

impl<N> From<Reply> for Inbound<N> {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Success(response) => Self::Response(response),
            Reply::Error(error) => Self::ErrorResponse(error),
        }
    }
}

/// Expands batches into their elements, in order. A single message comes
/// back as a one-element vector.
pub fn flatten<N>(message: ServerMessage<N>) -> Vec<Inbound<N>> {
    match message {
        ServerMessage::Response(response) => vec![Inbound::Response(response)],
        ServerMessage::ErrorResponse(error) => vec![Inbound::ErrorResponse(error)],
        ServerMessage::Notification(notification) => vec![Inbound::Notification(notification)],
        ServerMessage::BatchResponse(batch) => {
            batch.responses.into_iter().map(Inbound::from).collect()
        }
        ServerMessage::BatchRequest(batch) => batch
            .requests
            .into_iter()
            .map(Inbound::Notification)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use herald_jsonrpc::{BatchRequest, BatchResponse, ErrorDetail, Id, Notification};
    use serde_json::{json, Value};

    use super::*;

    fn response(id: u64) -> Response {
        Response {
            result: Value::Null,
            id: Id::from(id),
        }
    }

    #[test]
    fn test_single_response_is_one_element() {
        let flat = flatten::<Notification>(ServerMessage::Response(response(1)));
        assert_eq!(flat, vec![Inbound::Response(response(1))]);
    }

    #[test]
    fn test_batch_request_keeps_order_and_duplicates() {
        let a = Notification::new("subscription", json!("a"));
        let b = Notification::new("subscription", json!("b"));
        let flat = flatten(ServerMessage::BatchRequest(BatchRequest::new(vec![
            a.clone(),
            b.clone(),
            a.clone(),
        ])));
        assert_eq!(
            flat,
            vec![
                Inbound::Notification(a.clone()),
                Inbound::Notification(b),
                Inbound::Notification(a),
            ]
        );
    }

    #[test]
    fn test_batch_response_splits_success_and_error() {
        let error = ErrorResponse {
            error: ErrorDetail {
                code: -1,
                message: "no".into(),
                data: None,
            },
            id: Id::from(1u64),
        };
        let flat = flatten::<Notification>(ServerMessage::BatchResponse(BatchResponse::new(vec![
            Reply::Success(response(2)),
            Reply::Error(error.clone()),
        ])));
        assert_eq!(
            flat,
            vec![Inbound::Response(response(2)), Inbound::ErrorResponse(error)]
        );
    }

    #[test]
    fn test_empty_batch_flattens_to_nothing() {
        let flat = flatten::<Notification>(ServerMessage::BatchResponse(BatchResponse::new(vec![])));
        assert!(flat.is_empty());
    }
}
