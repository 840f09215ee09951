//! Handler error types

use crate::broadcast::RelayError;
use crate::protocol::CloseCode;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Relay refused the event
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),
}

impl HandlerError {
    /// Convert to the close code sent when the connection is dropped
    pub fn to_close_code(&self) -> CloseCode {
        match self {
            Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::Relay(_) => CloseCode::UnknownError,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
