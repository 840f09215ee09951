//! Application error types
//!
//! Process-level errors for the relay: startup, configuration and serving.

use crate::config::ConfigError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Listener errors
    #[error("Failed to bind to {addr}: {reason}")]
    Bind { addr: String, reason: String },

    // Serving errors
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Get a stable error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Bind { .. } => "BIND_ERROR",
            Self::Server(_) => "SERVER_ERROR",
        }
    }

    /// Create a bind error for an address
    #[must_use]
    pub fn bind(addr: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::Bind {
            addr: addr.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
