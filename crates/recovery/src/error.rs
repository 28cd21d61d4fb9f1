//! Recovery error types

use std::io;

use thiserror::Error;

/// Result type for recovery operations
pub type Result<T> = std::result::Result<T, RecoveryError>;

/// Errors that can occur persisting or restoring a snapshot
///
/// None of these are fatal to the engine: a load failure means cold-start
/// defaults, a persist failure means the next mutation tries again.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Failed to read or write the snapshot file
    #[error("snapshot I/O failed at '{path}': {source}")]
    Io {
        /// Snapshot path
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file does not start with the snapshot magic
    #[error("snapshot has wrong magic 0x{found:08X}")]
    BadMagic {
        /// Magic found in the file
        found: u32,
    },

    /// The schema version is not one this build understands
    #[error("snapshot schema version {found} unsupported (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file
        found: u16,
        /// Version this build writes
        expected: u16,
    },

    /// The file is shorter than its record count requires
    #[error("snapshot truncated: {actual} bytes, {expected} required")]
    Truncated {
        /// Bytes available
        actual: usize,
        /// Bytes required
        expected: usize,
    },

    /// A record carries an enable-state byte that is neither 0 nor 1
    #[error("snapshot record {index} has invalid state byte {value}")]
    InvalidState {
        /// Record index
        index: usize,
        /// Offending byte
        value: u8,
    },
}

impl RecoveryError {
    /// Create an Io error
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
