//! Relay wire protocol
//!
//! Defines the event names, frame format, payload shapes and close codes
//! exchanged with clients over the WebSocket connection.

mod close_codes;
mod events;
mod messages;
mod payloads;

pub use close_codes::CloseCode;
pub use events::EventName;
pub use messages::RelayFrame;
pub use payloads::{AckPayload, ConnectPayload, TypingPayload, ACK_PREFIX};
