//! Connection management
//!
//! Tracks live WebSocket connections, their outbound queues, and the
//! session id bound to each of them.

mod connection;
mod manager;
mod session;

pub use connection::{Connection, ConnectionHandle};
pub use manager::ConnectionManager;
pub use session::{SessionId, SessionRegistry};
