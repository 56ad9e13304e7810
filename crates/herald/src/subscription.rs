//! Per-connection event stream: receive frames, decode, correlate, emit.
//!
//! Each open feed gets one `Subscription`. The flow for every frame is:
//!   1. Parse the bytes with the codec
//!   2. Decode a server message
//!   3. Flatten batches into single messages, keeping their order
//!   4. Correlate each message into a [`FeedEvent`]
//!
//! Any failure along the way is logged, the connection is closed, and
//! the stream ends with a single [`FeedEvent::ConnectionClosed`]. Events
//! produced from a frame before its failing element are still delivered.

use std::collections::VecDeque;
use std::sync::Arc;

use herald_jsonrpc::FrameCodec;
use herald_transport::{Connection, ConnectionId, TransportError};
use tokio::sync::mpsc;

use crate::events::Correlation;
use crate::flatten::flatten;
use crate::protocol::FeedDecoders;
use crate::{ConnectionState, FeedConfig, FeedEvent, HeraldError};

/// A live feed over one connection.
///
/// Pull events with [`next_event`](Self::next_event), or hand the whole
/// stream to a channel with [`run`](Self::run).
pub struct Subscription<C, T, F> {
    conn: C,
    decoders: Arc<FeedDecoders<T>>,
    codec: Arc<F>,
    correlation: Correlation,
    state: ConnectionState,
    pending: VecDeque<FeedEvent<T>>,
}

impl<C, T, F> Subscription<C, T, F>
where
    C: Connection<Error = TransportError>,
    T: 'static,
    F: FrameCodec,
{
    pub(crate) fn new(
        conn: C,
        config: &FeedConfig,
        decoders: Arc<FeedDecoders<T>>,
        codec: Arc<F>,
    ) -> Self {
        Self {
            conn,
            decoders,
            codec,
            correlation: Correlation::new(config),
            state: ConnectionState::Connecting,
            pending: VecDeque::new(),
        }
    }

    /// The id of the underlying connection.
    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// Where the subscription is in its lifecycle.
    ///
    /// The state moves as events are produced, so it can run ahead of
    /// what the caller has pulled with [`next_event`](Self::next_event).
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once [`FeedEvent::ConnectionClosed`] has been
    /// returned; it is always the last event and appears exactly once.
    pub async fn next_event(&mut self) -> Option<FeedEvent<T>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if !self.state.is_open() {
                return None;
            }

            let id = self.conn.id();
            match self.conn.recv().await {
                Ok(Some(frame)) => {
                    tracing::debug!(%id, bytes = frame.len(), "received frame");
                    if let Err(e) = self.handle_frame(&frame) {
                        tracing::error!(%id, error = %e, "feed failed, closing");
                        self.finish();
                        if let Err(e) = self.conn.close().await {
                            tracing::debug!(%id, error = %e, "close after failure");
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!(%id, "connection closed by server");
                    self.finish();
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "recv error");
                    self.finish();
                }
            }
        }
    }

    /// Closes the connection from our side.
    ///
    /// Events already produced are still returned by
    /// [`next_event`](Self::next_event), followed by
    /// [`FeedEvent::ConnectionClosed`]. Closing twice is a no-op.
    ///
    /// # Errors
    /// Returns the transport error if the close handshake fails. The
    /// subscription is closed either way.
    pub async fn close(&mut self) -> Result<(), HeraldError> {
        if !self.state.is_open() {
            return Ok(());
        }
        tracing::info!(id = %self.conn.id(), "closing feed");
        self.finish();
        self.conn.close().await?;
        Ok(())
    }

    /// Forwards every event to `events`, ending after
    /// [`FeedEvent::ConnectionClosed`].
    ///
    /// If the receiver is dropped first, the connection is closed and
    /// the remaining events are discarded.
    pub async fn run(mut self, events: mpsc::Sender<FeedEvent<T>>) {
        while let Some(event) = self.next_event().await {
            if events.send(event).await.is_err() {
                tracing::debug!(id = %self.conn.id(), "event receiver dropped");
                if let Err(e) = self.close().await {
                    tracing::debug!(id = %self.conn.id(), error = %e, "close after receiver dropped");
                }
                break;
            }
        }
    }

    /// Turns one frame into events, queueing each one as soon as it is
    /// produced.
    fn handle_frame(&mut self, frame: &[u8]) -> Result<(), HeraldError> {
        let value = self.codec.decode_frame(frame)?;
        let message = self.decoders.message(&value)?;

        for inbound in flatten(message) {
            let event = self.correlation.to_event(inbound, &self.decoders)?;
            if matches!(event, FeedEvent::Subscribed)
                && self.state.can_transition_to(ConnectionState::Subscribed)
            {
                self.state = ConnectionState::Subscribed;
                tracing::info!(id = %self.conn.id(), "subscribed");
            }
            self.pending.push_back(event);
        }
        Ok(())
    }

    /// Queues the terminal event, once.
    fn finish(&mut self) {
        if self.state.can_transition_to(ConnectionState::Closed) {
            self.state = ConnectionState::Closed;
            self.pending.push_back(FeedEvent::ConnectionClosed);
        }
    }
}
