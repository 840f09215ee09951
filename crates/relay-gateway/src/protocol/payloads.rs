//! Outbound payload shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text preceding the session id in a message acknowledgment
pub const ACK_PREFIX: &str = "Server received your message!";

/// Handshake payload, carries the id assigned to the connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectPayload {
    pub sid: String,
}

/// Acknowledgment sent back to the author of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckPayload {
    pub data: String,
}

impl AckPayload {
    /// Build the acknowledgment for a session
    #[must_use]
    pub fn for_session(session_id: &str) -> Self {
        Self {
            data: format!("{ACK_PREFIX} {session_id}"),
        }
    }
}

/// Typing indicator attributed to its sender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingPayload {
    /// Session id of the connection that is typing
    pub uid: String,
    /// Opaque typing status as sent by the client
    pub typ: Value,
}
