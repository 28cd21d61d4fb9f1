//! Protocol error types

use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur when parsing a wire frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame shorter than the fixed header
    #[error("frame too short: {actual} bytes, header needs {expected}")]
    TooShort {
        /// Bytes received
        actual: usize,
        /// Minimum frame length
        expected: usize,
    },

    /// Declared length does not match the received frame
    #[error("frame length mismatch: header declares {declared} bytes, received {actual}")]
    LengthMismatch {
        /// Length field from the header
        declared: usize,
        /// Bytes actually received
        actual: usize,
    },

    /// Frame exceeds the maximum packet length
    #[error("frame too long: {actual} bytes, limit is {limit}")]
    TooLong {
        /// Bytes received
        actual: usize,
        /// Maximum frame length
        limit: usize,
    },
}
