//! Error types for the JSON-RPC layer.

use herald_decode::DecodeError;

/// Errors that can occur while turning frames into envelopes or back.
///
/// Each stage has its own variant, so a log line tells you whether the
/// peer sent bytes that are not JSON at all (`Parse`), JSON that is not a
/// valid envelope (`Decode`), or whether we failed to build our own
/// outbound message (`Encode`).
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON.
    #[error("malformed frame: {0}")]
    Parse(#[source] serde_json::Error),

    /// The frame is JSON but not a message we understand.
    ///
    /// The inner error carries the path of the offending property.
    #[error("decode failed at {path}: {0}", path = .0.path())]
    Decode(#[from] DecodeError),

    /// Params could not be converted to JSON, or a value could not be
    /// written to bytes.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
