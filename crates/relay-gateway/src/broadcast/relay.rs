//! Broadcast relay
//!
//! Re-emits chat messages and typing events from one connection to all
//! live connections, attributing them to the sender's session id.

use super::{Fanout, RelayResult};
use crate::connection::{ConnectionHandle, SessionRegistry};
use crate::protocol::RelayFrame;
use serde_json::Value;
use std::sync::Arc;

/// Relays inbound events to the live connections
///
/// Holds no connection collection of its own: identities come from the
/// [`SessionRegistry`] and delivery goes through a [`Fanout`].
#[derive(Clone)]
pub struct BroadcastRelay {
    sessions: Arc<SessionRegistry>,
    fanout: Arc<dyn Fanout>,
}

impl BroadcastRelay {
    /// Create a relay over a session registry and a delivery capability
    pub fn new(sessions: Arc<SessionRegistry>, fanout: Arc<dyn Fanout>) -> Self {
        Self { sessions, fanout }
    }

    /// Handle a chat message sent by `handle`
    ///
    /// The sender gets a `my_response` acknowledgment naming its session,
    /// then every live connection (sender included) gets the payload
    /// unchanged as a `message` event.
    pub async fn on_message(&self, handle: ConnectionHandle, payload: Value) -> RelayResult<()> {
        let session_id = self.sessions.current_id(handle)?;

        tracing::info!(
            handle = %handle,
            session_id = %session_id,
            payload = %payload,
            "Received message"
        );

        if !self.fanout.emit_to(handle, RelayFrame::ack(&session_id)).await {
            tracing::debug!(session_id = %session_id, "Acknowledgment not delivered");
        }

        let sent = self.fanout.emit_all(RelayFrame::message(payload)).await;

        tracing::trace!(session_id = %session_id, sent = sent, "Message relayed");

        Ok(())
    }

    /// Handle a typing indicator change sent by `handle`
    ///
    /// Every live connection gets `{"uid": <session id>, "typ": status}`.
    pub async fn on_typing(&self, handle: ConnectionHandle, status: Value) -> RelayResult<()> {
        let session_id = self.sessions.current_id(handle)?;

        let sent = self
            .fanout
            .emit_all(RelayFrame::typing(&session_id, status))
            .await;

        tracing::trace!(session_id = %session_id, sent = sent, "Typing relayed");

        Ok(())
    }
}

impl std::fmt::Debug for BroadcastRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastRelay")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
