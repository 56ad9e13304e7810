//! Unified error type for Herald.

use herald_decode::DecodeError;
use herald_jsonrpc::{Id, ProtocolError};
use herald_transport::TransportError;

/// A well-formed message that breaks the feed protocol.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolViolation {
    /// The server answered one of our requests with an error.
    #[error("request {id} failed with code {code}: {message}")]
    ErrorResponse { id: Id, code: i64, message: String },

    /// A response whose id matches no request of this connection.
    #[error("unexpected response with id {id}")]
    UnexpectedResponse { id: Id },
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HeraldError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be parsed, decoded or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server broke the feed protocol.
    #[error(transparent)]
    Violation(#[from] ProtocolViolation),

    /// The client configuration cannot work.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<DecodeError> for HeraldError {
    fn from(err: DecodeError) -> Self {
        Self::Protocol(ProtocolError::Decode(err))
    }
}

#[cfg(test)]
mod tests {
    use herald_decode::Path;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let herald_err: HeraldError = err.into();
        assert!(matches!(herald_err, HeraldError::Transport(_)));
        assert!(herald_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_decode_error_is_protocol() {
        let err = DecodeError::new(&Path::root(), "Expected $ to be null.");
        let herald_err: HeraldError = err.into();
        assert!(matches!(
            herald_err,
            HeraldError::Protocol(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_violation_display() {
        let err = ProtocolViolation::UnexpectedResponse { id: Id::from(99u64) };
        assert_eq!(err.to_string(), "unexpected response with id 99");

        let err = ProtocolViolation::ErrorResponse {
            id: Id::from(1u64),
            code: -32601,
            message: "Method not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "request 1 failed with code -32601: Method not found"
        );
        let herald_err: HeraldError = err.into();
        assert!(matches!(herald_err, HeraldError::Violation(_)));
    }
}
