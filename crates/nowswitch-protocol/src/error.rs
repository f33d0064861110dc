//! Error types for the switch protocol.

use thiserror::Error;

/// Errors that can occur when encoding or validating protocol data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The device address does not match any accepted format.
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// An empty payload was given where content is required.
    #[error("empty message")]
    EmptyMessage,

    /// The rendered line would exceed the single-datagram limit.
    #[error("payload overflow: max {max} bytes, got {actual}")]
    PayloadOverflow { max: usize, actual: usize },

    /// A command line could not be decoded.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
}

impl ProtocolError {
    /// Create an invalid-address error from the offending input.
    pub fn invalid_address(input: impl Into<String>) -> Self {
        ProtocolError::InvalidAddress(input.into())
    }

    /// Create a malformed-command error.
    pub fn malformed_command(msg: impl Into<String>) -> Self {
        ProtocolError::MalformedCommand(msg.into())
    }
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::invalid_address("junk");
        assert_eq!(err.to_string(), "invalid device address: junk");

        let err = ProtocolError::PayloadOverflow { max: 64, actual: 90 };
        assert_eq!(err.to_string(), "payload overflow: max 64 bytes, got 90");
    }
}
