//! Error types for the controller.

use thiserror::Error;

use crate::transport::TransportError;
use nowswitch_protocol::ProtocolError;

/// Errors surfaced by controller operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// A configuration value is out of range or unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Encoding or validation failed before anything was transmitted.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transport rejected an operation.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ControlError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        ControlError::Config(msg.into())
    }
}

/// Result type alias for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_pass_through() {
        let err: ControlError = ProtocolError::EmptyMessage.into();
        assert_eq!(err.to_string(), "empty message");
    }

    #[test]
    fn test_config_error_display() {
        let err = ControlError::config("retry_count must be 1-100, got 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: retry_count must be 1-100, got 0"
        );
    }
}
