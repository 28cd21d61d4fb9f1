//! Engine error types

use packrat_filter::FilterError;
use packrat_storage::StorageError;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by engine commands
///
/// Every error is rejected-before-mutation: a failed command leaves the
/// tables exactly as they were. None is fatal to the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Filter table or MID index rejected the operation
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Destination tables or rotation manager rejected the operation
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Size limit outside the accepted bounds
    #[error("invalid size limit {limit}")]
    InvalidSize {
        /// Rejected limit
        limit: u32,
    },

    /// Age limit outside the accepted bounds
    #[error("invalid age limit {limit}")]
    InvalidAge {
        /// Rejected limit
        limit: u32,
    },

    /// Sequence count above the eight-digit ceiling
    #[error("invalid sequence count {count}")]
    InvalidCount {
        /// Rejected count
        count: u32,
    },
}
