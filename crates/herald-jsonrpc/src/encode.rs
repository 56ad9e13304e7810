//! Encoders: typed envelopes back to plain JSON values.
//!
//! Encoding is the structural inverse of decoding. Each shape becomes an
//! object with the `"jsonrpc": "2.0"` tag added, keys written in the order
//! `jsonrpc`, `method`/`result`/`error`, `params`, `id`, and absent
//! optional properties left out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    BatchRequest, BatchResponse, Call, ClientMessage, ErrorDetail, ErrorResponse, Notification,
    ProtocolError, Reply, Request, Response, ServerMessage, JSONRPC_VERSION,
};

/// Converts a message into the JSON value sent on the wire.
pub trait Encode {
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if typed params cannot be
    /// represented as JSON.
    fn to_wire(&self) -> Result<Value, ProtocolError>;
}

fn envelope() -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("jsonrpc".into(), Value::from(JSONRPC_VERSION));
    object
}

fn params_to_value<P: Serialize>(params: &P) -> Result<Value, ProtocolError> {
    serde_json::to_value(params).map_err(ProtocolError::Encode)
}

impl<P: Serialize> Encode for Notification<P> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        let mut object = envelope();
        object.insert("method".into(), Value::from(self.method.as_str()));
        object.insert("params".into(), params_to_value(&self.params)?);
        Ok(Value::Object(object))
    }
}

impl<P: Serialize> Encode for Request<P> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        let mut object = envelope();
        object.insert("method".into(), Value::from(self.method.as_str()));
        object.insert("params".into(), params_to_value(&self.params)?);
        object.insert("id".into(), self.id.clone().into());
        Ok(Value::Object(object))
    }
}

impl<P: Serialize> Encode for Call<P> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        match self {
            Self::Notification(notification) => notification.to_wire(),
            Self::Request(request) => request.to_wire(),
        }
    }
}

impl<T: Encode> Encode for BatchRequest<T> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        self.requests
            .iter()
            .map(Encode::to_wire)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<P: Serialize> Encode for ClientMessage<P> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        match self {
            Self::Notification(notification) => notification.to_wire(),
            Self::Request(request) => request.to_wire(),
            Self::Batch(batch) => batch.to_wire(),
        }
    }
}

impl Encode for Response {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        let mut object = envelope();
        object.insert("result".into(), self.result.clone());
        object.insert("id".into(), self.id.clone().into());
        Ok(Value::Object(object))
    }
}

impl Encode for ErrorDetail {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        let mut object = Map::new();
        object.insert("code".into(), Value::from(self.code));
        object.insert("message".into(), Value::from(self.message.as_str()));
        if let Some(data) = &self.data {
            object.insert("data".into(), data.clone());
        }
        Ok(Value::Object(object))
    }
}

impl Encode for ErrorResponse {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        let mut object = envelope();
        object.insert("error".into(), self.error.to_wire()?);
        object.insert("id".into(), self.id.clone().into());
        Ok(Value::Object(object))
    }
}

impl Encode for Reply {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        match self {
            Self::Success(response) => response.to_wire(),
            Self::Error(error) => error.to_wire(),
        }
    }
}

impl Encode for BatchResponse {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        self.responses
            .iter()
            .map(Encode::to_wire)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl<N: Encode> Encode for ServerMessage<N> {
    fn to_wire(&self) -> Result<Value, ProtocolError> {
        match self {
            Self::Response(response) => response.to_wire(),
            Self::ErrorResponse(error) => error.to_wire(),
            Self::BatchResponse(batch) => batch.to_wire(),
            Self::Notification(notification) => notification.to_wire(),
            Self::BatchRequest(batch) => batch.to_wire(),
        }
    }
}
