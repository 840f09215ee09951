//! Inbound event handlers
//!
//! Decodes client frames and routes them by event name to the relay.

mod error;

pub use error::{HandlerError, HandlerResult};

use crate::broadcast::BroadcastRelay;
use crate::connection::ConnectionHandle;
use crate::protocol::{EventName, RelayFrame};

/// Dispatch incoming client frames to the relay
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Decode a text frame and dispatch it
    pub async fn handle_text(
        relay: &BroadcastRelay,
        handle: ConnectionHandle,
        text: &str,
    ) -> HandlerResult<()> {
        let frame = RelayFrame::from_json(text)?;

        tracing::trace!(handle = %handle, event = %frame.event, "Received frame");

        Self::dispatch(relay, handle, frame).await
    }

    /// Handle an incoming client frame
    ///
    /// Events with no handler are ignored, the same way an event emitter
    /// drops events nobody listens for.
    pub async fn dispatch(
        relay: &BroadcastRelay,
        handle: ConnectionHandle,
        frame: RelayFrame,
    ) -> HandlerResult<()> {
        match frame.event_name() {
            Some(EventName::Message) => relay.on_message(handle, frame.into_data()).await?,
            Some(EventName::Typing) => relay.on_typing(handle, frame.into_data()).await?,
            Some(event) => {
                tracing::debug!(
                    handle = %handle,
                    event = %event,
                    "Ignoring server-side event sent by client"
                );
            }
            None => {
                tracing::debug!(
                    handle = %handle,
                    event = %frame.event,
                    "No handler for event, ignoring"
                );
            }
        }

        Ok(())
    }
}
