//! JSON-RPC 2.0 message shapes.
//!
//! Every shape that can travel on the wire has its own type, and the
//! "one of several shapes" positions ([`Call`], [`Reply`],
//! [`ClientMessage`], [`ServerMessage`]) are closed enums. Code that
//! handles a message matches on the enum, and the compiler rejects a
//! `match` that forgets a variant.
//!
//! None of these types mention the `"jsonrpc": "2.0"` tag: the decoders
//! check it and the encoders add it, so a value that exists in Rust has
//! already been validated.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The only protocol version accepted or produced.
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// Id
// ---------------------------------------------------------------------------

/// A request identifier: a string, a number, or `null`.
///
/// `==` compares ids exactly. `Id::from(1)` and `Id::from("1")` are
/// different ids, and a number id keeps its JSON representation, so an id
/// that arrives as `7` is sent back as `7`, never as `7.0`. Use
/// [`Id::matches`] to correlate a reply with a request, where `2.0`
/// answers `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// `"id": null`.
    Null,
    /// `"id": 42`.
    Number(Number),
    /// `"id": "abc"`.
    String(String),
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::String(id.to_owned())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::Null => Value::Null,
            Id::Number(n) => Value::Number(n),
            Id::String(s) => Value::String(s),
        }
    }
}

impl Id {
    /// Returns `true` if `self` and `other` name the same request.
    ///
    /// Number ids compare by value, so `2` and `2.0` match.
    /// A string never matches a number.
    pub fn matches(&self, other: &Id) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => same_number(a, b),
            _ => self == other,
        }
    }
}

fn same_number(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// A call that expects no answer. Never carries an `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<P = Value> {
    pub method: String,
    pub params: P,
}

impl<P> Notification<P> {
    pub fn new(method: impl Into<String>, params: P) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// A call that expects a [`Response`] or [`ErrorResponse`] with the same
/// `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<P = Value> {
    pub method: String,
    pub params: P,
    /// Chosen by the caller; unique among the requests in flight.
    pub id: Id,
}

impl<P> Request<P> {
    pub fn new(id: impl Into<Id>, method: impl Into<String>, params: P) -> Self {
        Self {
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// One element of a client batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Call<P = Value> {
    Notification(Notification<P>),
    Request(Request<P>),
}

impl<P> From<Notification<P>> for Call<P> {
    fn from(notification: Notification<P>) -> Self {
        Self::Notification(notification)
    }
}

impl<P> From<Request<P>> for Call<P> {
    fn from(request: Request<P>) -> Self {
        Self::Request(request)
    }
}

/// Several messages sent as one JSON array. Order is preserved.
///
/// Client batches hold [`Call`]s; a server pushing several notifications
/// at once sends a `BatchRequest` of notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest<T = Call> {
    pub requests: Vec<T>,
}

impl<T> BatchRequest<T> {
    pub fn new(requests: Vec<T>) -> Self {
        Self { requests }
    }
}

/// Anything a client may send.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage<P = Value> {
    Notification(Notification<P>),
    Request(Request<P>),
    Batch(BatchRequest<Call<P>>),
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// A successful answer to the request with the same `id`.
///
/// `result` is kept untyped: which decoder applies depends on which
/// request the id belongs to, and that is only known after correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub result: Value,
    pub id: Id,
}

/// The `error` object of an [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub code: i64,
    pub message: String,
    /// Omitted from the wire when `None`.
    pub data: Option<Value>,
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// A failed answer to the request with the same `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub id: Id,
}

/// One element of a [`BatchResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(Response),
    Error(ErrorResponse),
}

impl Reply {
    /// The id of the request this reply answers.
    pub fn id(&self) -> &Id {
        match self {
            Self::Success(response) => &response.id,
            Self::Error(error) => &error.id,
        }
    }
}

/// Several replies received as one JSON array. Order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResponse {
    pub responses: Vec<Reply>,
}

impl BatchResponse {
    pub fn new(responses: Vec<Reply>) -> Self {
        Self { responses }
    }
}

/// Anything a server may send.
///
/// `N` is the notification type the application understands, typically a
/// [`Notification`] with typed params.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage<N = Notification> {
    Response(Response),
    ErrorResponse(ErrorResponse),
    BatchResponse(BatchResponse),
    Notification(N),
    BatchRequest(BatchRequest<N>),
}
