/// Errors that can occur in the transport layer.
///
/// These are opaque to the protocol layers above: whatever the cause, a
/// failed channel ends the subscription running over it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Establishing the channel failed (bad URL, refused, handshake error).
    #[error("connect to {url} failed: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The channel was already closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
