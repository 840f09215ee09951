//! Connection manager
//!
//! Owns the set of live WebSocket connections using DashMap for thread-safe
//! access, and provides the emit-to-one / emit-to-all primitives.

use super::{Connection, ConnectionHandle};
use crate::broadcast::Fanout;
use crate::protocol::RelayFrame;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Manages all live WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state. Delivery never
/// waits on a peer: a full outbound queue drops the frame for that peer only.
pub struct ConnectionManager {
    /// Active connections by handle
    connections: DashMap<ConnectionHandle, Arc<Connection>>,

    /// Next handle to allocate
    next_handle: AtomicU64,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection under a fresh handle
    pub fn add_connection(&self, sender: mpsc::Sender<RelayFrame>) -> Arc<Connection> {
        let handle = ConnectionHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        let connection = Connection::new(handle, sender);
        self.connections.insert(handle, connection.clone());

        tracing::debug!(handle = %handle, "Connection added");

        connection
    }

    /// Remove a connection
    ///
    /// Returns `false` if the handle was already removed.
    pub fn remove_connection(&self, handle: ConnectionHandle) -> bool {
        if let Some((_, connection)) = self.connections.remove(&handle) {
            tracing::debug!(
                handle = %handle,
                age_ms = connection.age().as_millis(),
                "Connection removed"
            );

            true
        } else {
            false
        }
    }

    /// Get a connection by handle
    pub fn get_connection(&self, handle: ConnectionHandle) -> Option<Arc<Connection>> {
        self.connections.get(&handle).map(|r| r.clone())
    }

    /// Snapshot of the live connections
    ///
    /// The map guards are released before this returns.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.connections.iter().map(|r| r.value().clone()).collect()
    }

    /// Send a frame to a single connection
    pub fn send_to(&self, handle: ConnectionHandle, frame: RelayFrame) -> bool {
        let Some(connection) = self.get_connection(handle) else {
            tracing::trace!(handle = %handle, "Send to unknown connection skipped");
            return false;
        };

        Self::deliver(&connection, frame)
    }

    /// Broadcast a frame to all connections
    ///
    /// Connections that are gone or not keeping up are skipped.
    pub fn broadcast(&self, frame: &RelayFrame) -> usize {
        let sent = self
            .snapshot()
            .iter()
            .filter(|conn| Self::deliver(conn, frame.clone()))
            .count();

        tracing::debug!(event = %frame.event, sent = sent, "Frame broadcast to all connections");

        sent
    }

    fn deliver(connection: &Connection, frame: RelayFrame) -> bool {
        match connection.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                tracing::debug!(
                    handle = %connection.handle(),
                    event = %frame.event,
                    "Outbound queue full, dropping frame for slow connection"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::trace!(handle = %connection.handle(), "Skipping closed connection");
                false
            }
        }
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[async_trait]
impl Fanout for ConnectionManager {
    async fn emit_to(&self, handle: ConnectionHandle, frame: RelayFrame) -> bool {
        self.send_to(handle, frame)
    }

    async fn emit_all(&self, frame: RelayFrame) -> usize {
        self.broadcast(&frame)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
