//! Frame codec: raw bytes ↔ `serde_json::Value`.
//!
//! The transport moves opaque frames; the decoders work on JSON values.
//! A codec sits in between. It only knows about *syntax* (is this valid
//! JSON?), never about envelopes, so the same codec serves every message
//! type.

use serde_json::Value;

use crate::ProtocolError;

/// Converts one wire frame to and from a JSON value.
///
/// `Send + Sync + 'static` because a codec lives inside long-running
/// connection tasks that Tokio may move between threads.
pub trait FrameCodec: Send + Sync + 'static {
    /// Writes `value` as one frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be written.
    fn encode_frame(&self, value: &Value) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Parse`] if the bytes are not valid JSON.
    fn decode_frame(&self, frame: &[u8]) -> Result<Value, ProtocolError>;
}

/// A [`FrameCodec`] for UTF-8 JSON text, one value per frame.
///
/// ```rust
/// use herald_jsonrpc::{FrameCodec, JsonCodec};
/// use serde_json::json;
///
/// let codec = JsonCodec;
/// let bytes = codec.encode_frame(&json!({ "jsonrpc": "2.0" })).unwrap();
/// assert_eq!(bytes, br#"{"jsonrpc":"2.0"}"#);
/// assert_eq!(codec.decode_frame(&bytes).unwrap(), json!({ "jsonrpc": "2.0" }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl FrameCodec for JsonCodec {
    fn encode_frame(&self, value: &Value) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode_frame(&self, frame: &[u8]) -> Result<Value, ProtocolError> {
        serde_json::from_slice(frame).map_err(ProtocolError::Parse)
    }
}
