//! Session registry
//!
//! Binds a freshly generated session id to every live connection handle.
//! Handlers receive the handle explicitly and resolve the id here.

use super::ConnectionHandle;
use crate::broadcast::{RelayError, RelayResult};
use dashmap::DashMap;
use std::sync::Arc;

/// Session identifier handed to clients (UUID v4, hyphenated)
pub type SessionId = String;

/// Registry of session ids keyed by connection handle
pub struct SessionRegistry {
    sessions: DashMap<ConnectionHandle, SessionId>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create an empty registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> SessionId {
        uuid::Uuid::new_v4().to_string()
    }

    /// Bind a new session id to a freshly accepted connection
    ///
    /// A handle keeps the id it was first given; calling this again for a
    /// handle that is still bound returns the existing id.
    pub fn on_connect(&self, handle: ConnectionHandle) -> SessionId {
        let session_id = self
            .sessions
            .entry(handle)
            .or_insert_with(Self::generate_id)
            .clone();

        tracing::info!(handle = %handle, session_id = %session_id, "Client connected");

        session_id
    }

    /// Release the session bound to a connection
    ///
    /// Returns the released id, or `None` if the handle was not bound.
    pub fn on_disconnect(&self, handle: ConnectionHandle) -> Option<SessionId> {
        let (_, session_id) = self.sessions.remove(&handle)?;

        tracing::info!(handle = %handle, session_id = %session_id, "Client disconnected");

        Some(session_id)
    }

    /// Resolve the session id of the connection an event came from
    pub fn current_id(&self, handle: ConnectionHandle) -> RelayResult<SessionId> {
        self.sessions
            .get(&handle)
            .map(|entry| entry.value().clone())
            .ok_or(RelayError::InvalidContext(handle))
    }

    /// Number of bound sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session is bound
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
