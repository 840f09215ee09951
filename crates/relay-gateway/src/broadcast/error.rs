//! Relay error types

use crate::connection::ConnectionHandle;
use thiserror::Error;

/// Relay error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Identity lookup for a connection with no bound session
    ///
    /// Either the handle was never connected or it has already
    /// disconnected. This is a caller contract violation, never retried.
    #[error("No session bound to connection {0}")]
    InvalidContext(ConnectionHandle),
}

/// Relay result type
pub type RelayResult<T> = Result<T, RelayError>;
