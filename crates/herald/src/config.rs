//! Feed configuration and the connection state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FeedConfig
// ---------------------------------------------------------------------------

/// Where the feed lives and how its methods are named.
///
/// Every field has a default, so a partial config file (or none at all)
/// deserializes into a working setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// WebSocket URL of the feed server.
    pub url: String,

    /// Method of the request that fetches results missed since the cursor.
    pub catch_up_method: String,

    /// Method of the request that starts the live subscription.
    pub subscribe_method: String,

    /// Method of the notifications pushed after subscribing.
    pub notification_method: String,

    /// Request id of the catch-up request.
    pub catch_up_id: u64,

    /// Request id of the subscribe request. Must differ from
    /// `catch_up_id`.
    pub subscribe_id: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:15455".to_string(),
            catch_up_method: "get_battle_results".to_string(),
            subscribe_method: "subscribe".to_string(),
            notification_method: "subscription".to_string(),
            catch_up_id: 1,
            subscribe_id: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The lifecycle state of one subscription.
///
/// ```text
/// Connecting → Subscribed → Closed
///      └───────────────────────↑
/// ```
///
/// - **Connecting**: The initial batch is sent; the server has not yet
///   acknowledged the subscribe request. Catch-up results may already
///   arrive in this state.
/// - **Subscribed**: The subscribe request succeeded; live notifications
///   are expected.
/// - **Closed**: The terminal event was produced. Nothing leaves this
///   state; reconnecting means opening a new subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connecting,
    Subscribed,
    Closed,
}

impl ConnectionState {
    /// Returns `true` until the terminal event was produced.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The state that normally follows this one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Connecting => Some(Self::Subscribed),
            Self::Subscribed => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    ///
    /// Besides the normal order, a connection may close before it ever
    /// subscribed.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (self == Self::Connecting && target == Self::Closed)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Subscribed => write!(f, "Subscribed"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}
