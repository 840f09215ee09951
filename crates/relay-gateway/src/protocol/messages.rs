//! Relay frame format
//!
//! Defines the structure of every WebSocket text frame.

use super::{AckPayload, ConnectPayload, EventName, TypingPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relay frame format
///
/// `{"event": "<name>", "data": <json>}`, with `data` omitted when absent.
/// The event name is kept as a string so frames with names the relay has
/// no handler for still decode and can be ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    /// Event name
    pub event: String,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RelayFrame {
    /// Create a frame for a named event
    #[must_use]
    pub fn new(event: EventName, data: Option<Value>) -> Self {
        Self {
            event: event.as_str().to_string(),
            data,
        }
    }

    // === Server Frames ===

    /// Create the handshake frame sent on connect
    #[must_use]
    pub fn connect(session_id: &str) -> Self {
        let payload = ConnectPayload {
            sid: session_id.to_string(),
        };
        Self::new(EventName::Connect, serde_json::to_value(payload).ok())
    }

    /// Create the acknowledgment for a received chat message
    #[must_use]
    pub fn ack(session_id: &str) -> Self {
        Self::new(
            EventName::MyResponse,
            serde_json::to_value(AckPayload::for_session(session_id)).ok(),
        )
    }

    /// Create a chat message frame carrying the payload untouched
    #[must_use]
    pub fn message(payload: Value) -> Self {
        Self::new(EventName::Message, Some(payload))
    }

    /// Create a typing frame attributed to a session
    #[must_use]
    pub fn typing(session_id: &str, status: Value) -> Self {
        let payload = TypingPayload {
            uid: session_id.to_string(),
            typ: status,
        };
        Self::new(EventName::Typing, serde_json::to_value(payload).ok())
    }

    // === Utilities ===

    /// Resolve the event name, if the relay knows it
    #[must_use]
    pub fn event_name(&self) -> Option<EventName> {
        EventName::parse(&self.event)
    }

    /// Take the data payload, treating a missing one as `null`
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data.unwrap_or(Value::Null)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for RelayFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RelayFrame(event={})", self.event)
    }
}
