//! JSON-RPC 2.0 for Herald.
//!
//! This crate is the envelope layer between raw frames and application
//! messages:
//!
//! - **Types** ([`Request`], [`Notification`], [`Response`],
//!   [`ErrorResponse`], the batch shapes, and the [`ClientMessage`] /
//!   [`ServerMessage`] sums): what travels on the wire.
//! - **Decoders** ([`server_message_decoder`] and friends): untyped JSON
//!   to envelopes, built from `herald-decode`.
//! - **Encoders** ([`Encode`]): envelopes back to JSON.
//! - **Codec** ([`FrameCodec`], [`JsonCodec`]): frames to and from JSON.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Codec (Value) → Decoders (ServerMessage) → application
//! ```
//!
//! The layer knows nothing about connections or about what the methods
//! mean. It is generic over the params and notification types it carries.

mod codec;
mod decoders;
mod encode;
mod error;
mod types;

pub use codec::{FrameCodec, JsonCodec};
pub use decoders::{
    any_notification_decoder, batch_request_decoder, batch_response_decoder, call_decoder,
    client_message_decoder, error_detail_decoder, error_response_decoder, id_decoder,
    notification_decoder, request_decoder, response_decoder, server_message_decoder,
    version_decoder,
};
pub use encode::Encode;
pub use error::ProtocolError;
pub use types::{
    BatchRequest, BatchResponse, Call, ClientMessage, ErrorDetail, ErrorResponse, Id,
    Notification, Reply, Request, Response, ServerMessage, JSONRPC_VERSION,
};
