//! Storage error types

use std::io;

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors from the destination file tables and rotation manager
///
/// I/O errors are local to one destination index: they never stop admission
/// or rotation for other destinations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Destination file index out of range
    #[error("destination file index {index} out of range (table has {len} entries)")]
    InvalidDest {
        /// Offending index
        index: usize,
        /// Table length
        len: usize,
    },

    /// Failed to create a destination file
    #[error("failed to open destination {dest} file '{path}': {source}")]
    Open {
        /// Destination index
        dest: usize,
        /// Composed filename
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A write to an open destination file failed
    #[error("write to destination {dest} failed: {source}")]
    Write {
        /// Destination index
        dest: usize,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The open handle for a destination was lost mid-write
    ///
    /// The file is forced closed without a header update - the header
    /// cannot be assumed writable once the handle is gone.
    #[error("destination {dest} file handle lost: {source}")]
    HandleLost {
        /// Destination index
        dest: usize,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Create an InvalidDest error
    #[inline]
    pub fn invalid_dest(index: usize, len: usize) -> Self {
        Self::InvalidDest { index, len }
    }
}
