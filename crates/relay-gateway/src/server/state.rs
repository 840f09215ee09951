//! Gateway state
//!
//! Application state for the relay server.

use crate::broadcast::BroadcastRelay;
use crate::connection::{ConnectionManager, SessionRegistry};
use relay_common::AppConfig;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the relay server.
#[derive(Clone)]
pub struct GatewayState {
    /// Live WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Session ids by connection
    sessions: Arc<SessionRegistry>,
    /// Message and typing fan-out
    relay: BroadcastRelay,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(config: AppConfig) -> Self {
        let connection_manager = ConnectionManager::new_shared();
        let sessions = SessionRegistry::new_shared();
        let relay = BroadcastRelay::new(sessions.clone(), connection_manager.clone());

        Self {
            connection_manager,
            sessions,
            relay,
            config: Arc::new(config),
        }
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the session registry
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Get the broadcast relay
    pub fn relay(&self) -> &BroadcastRelay {
        &self.relay
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("sessions", &self.sessions)
            .field("config", &"AppConfig")
            .finish()
    }
}
