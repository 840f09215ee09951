//! Relay event names
//!
//! Every frame carries one of these names in its `event` field.

/// Named events understood by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Handshake sent to a newly accepted connection (server only)
    Connect,
    /// Connection teardown, raised by the transport (never sent on the wire)
    Disconnect,
    /// Chat message (client/server)
    Message,
    /// Typing indicator change (client/server)
    Typing,
    /// Acknowledgment of a received chat message (server only)
    MyResponse,
}

impl EventName {
    /// Parse an event name as it appears on the wire
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "connect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            "message" => Some(Self::Message),
            "typing" => Some(Self::Typing),
            "my_response" => Some(Self::MyResponse),
            _ => None,
        }
    }

    /// Get the wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Message => "message",
            Self::Typing => "typing",
            Self::MyResponse => "my_response",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
