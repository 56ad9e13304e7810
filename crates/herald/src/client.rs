//! `FeedClient` builder and the open handshake.
//!
//! This is the entry point for consuming a feed. It ties together the
//! layers: transport → codec → envelopes → feed protocol.

use std::sync::Arc;

use herald_decode::Decoder;
use herald_jsonrpc::{Encode, FrameCodec, JsonCodec};
use herald_transport::{Connection, Connector, TransportError, WebSocketConnector};

use crate::protocol::{initial_batch, FeedDecoders};
use crate::{FeedConfig, HeraldError, Subscription};

/// Builder for configuring a [`FeedClient`].
///
/// # Example
///
/// ```rust,no_run
/// use herald::prelude::*;
/// use herald_decode::any;
///
/// # async fn run() -> Result<(), HeraldError> {
/// let client = FeedClient::builder()
///     .url("ws://localhost:15455")
///     .build(any())?;
/// let mut subscription = client.open(None).await?;
/// while let Some(event) = subscription.next_event().await {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct FeedClientBuilder<F = JsonCodec> {
    config: FeedConfig,
    codec: F,
}

impl FeedClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: FeedConfig::default(),
            codec: JsonCodec,
        }
    }
}

impl Default for FeedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FrameCodec> FeedClientBuilder<F> {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: FeedConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the WebSocket URL of the feed server.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Sets the method of the catch-up request.
    pub fn catch_up_method(mut self, method: impl Into<String>) -> Self {
        self.config.catch_up_method = method.into();
        self
    }

    /// Sets the method of the subscribe request.
    pub fn subscribe_method(mut self, method: impl Into<String>) -> Self {
        self.config.subscribe_method = method.into();
        self
    }

    /// Sets the method of live notifications.
    pub fn notification_method(mut self, method: impl Into<String>) -> Self {
        self.config.notification_method = method.into();
        self
    }

    /// Sets the ids of the catch-up and subscribe requests.
    pub fn request_ids(mut self, catch_up: u64, subscribe: u64) -> Self {
        self.config.catch_up_id = catch_up;
        self.config.subscribe_id = subscribe;
        self
    }

    /// Swaps the frame codec.
    pub fn codec<G: FrameCodec>(self, codec: G) -> FeedClientBuilder<G> {
        FeedClientBuilder {
            config: self.config,
            codec,
        }
    }

    /// Builds a client that dials the configured URL over WebSocket,
    /// decoding each battle result with `item`.
    ///
    /// # Errors
    /// Returns [`HeraldError::InvalidConfig`] if both requests share an id.
    pub fn build<D>(self, item: D) -> Result<FeedClient<WebSocketConnector, D::Output, F>, HeraldError>
    where
        D: Decoder + Send + Sync + 'static,
        D::Output: 'static,
    {
        let connector = WebSocketConnector::new(self.config.url.clone());
        self.build_with(connector, item)
    }

    /// Builds a client over any [`Connector`].
    ///
    /// # Errors
    /// Returns [`HeraldError::InvalidConfig`] if both requests share an id.
    pub fn build_with<K, D>(self, connector: K, item: D) -> Result<FeedClient<K, D::Output, F>, HeraldError>
    where
        K: Connector,
        D: Decoder + Send + Sync + 'static,
        D::Output: 'static,
    {
        if self.config.catch_up_id == self.config.subscribe_id {
            return Err(HeraldError::InvalidConfig(format!(
                "catch-up and subscribe requests both use id {}",
                self.config.catch_up_id
            )));
        }

        let decoders = FeedDecoders::new(&self.config.notification_method, item);
        Ok(FeedClient {
            connector,
            config: self.config,
            decoders: Arc::new(decoders),
            codec: Arc::new(self.codec),
        })
    }
}

/// Opens subscriptions to one feed.
///
/// The client is cheap to keep around: decoders are built once and shared
/// by every [`Subscription`] it opens.
pub struct FeedClient<K, T, F = JsonCodec> {
    connector: K,
    config: FeedConfig,
    decoders: Arc<FeedDecoders<T>>,
    codec: Arc<F>,
}

impl FeedClient<WebSocketConnector, ()> {
    /// Creates a new builder.
    pub fn builder() -> FeedClientBuilder {
        FeedClientBuilder::new()
    }
}

impl<K, T, F> FeedClient<K, T, F>
where
    K: Connector<Error = TransportError>,
    K::Connection: Connection<Error = TransportError>,
    T: 'static,
    F: FrameCodec,
{
    /// The configuration this client was built with.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Connects and sends the catch-up + subscribe batch.
    ///
    /// `after` is the timestamp of the last battle result the caller has
    /// seen; the catch-up request asks for everything after it. Each call
    /// opens an independent connection with a fresh id space.
    ///
    /// # Errors
    /// Fails if connecting, encoding or sending the batch fails. Anything
    /// that goes wrong later ends the subscription with
    /// [`FeedEvent::ConnectionClosed`](crate::FeedEvent::ConnectionClosed)
    /// instead.
    pub async fn open(&self, after: Option<f64>) -> Result<Subscription<K::Connection, T, F>, HeraldError> {
        let batch = initial_batch(&self.config, after)?;
        let frame = self.codec.encode_frame(&batch.to_wire()?)?;

        let conn = self.connector.connect().await?;
        let id = conn.id();
        conn.send(&frame).await?;
        tracing::info!(%id, url = %self.config.url, ?after, "feed opened");

        Ok(Subscription::new(
            conn,
            &self.config,
            Arc::clone(&self.decoders),
            Arc::clone(&self.codec),
        ))
    }
}
