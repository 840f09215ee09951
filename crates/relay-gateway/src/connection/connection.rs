//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its outbound queue.

use crate::protocol::RelayFrame;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Opaque handle identifying a connection inside this process
///
/// Allocated by the [`ConnectionManager`](super::ConnectionManager); never
/// reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionHandle(u64);

impl ConnectionHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single WebSocket connection
pub struct Connection {
    /// Transport handle
    handle: ConnectionHandle,

    /// Channel to send frames to the WebSocket
    sender: mpsc::Sender<RelayFrame>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(handle: ConnectionHandle, sender: mpsc::Sender<RelayFrame>) -> Arc<Self> {
        Arc::new(Self {
            handle,
            sender,
            created_at: Instant::now(),
        })
    }

    /// Get the transport handle
    pub fn handle(&self) -> ConnectionHandle {
        self.handle
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Queue a frame for this connection (non-blocking)
    ///
    /// Fails with `Full` when the client is not draining its socket, and
    /// with `Closed` once the socket's send task has gone away.
    pub fn try_send(&self, frame: RelayFrame) -> Result<(), mpsc::error::TrySendError<RelayFrame>> {
        self.sender.try_send(frame)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("handle", &self.handle)
            .field("created_at", &self.created_at)
            .finish()
    }
}
