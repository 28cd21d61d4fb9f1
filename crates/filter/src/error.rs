//! Filter error types

use packrat_protocol::MessageId;
use thiserror::Error;

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur in the filter table and MID index
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// MID is already registered in the filter table
    #[error("MID {mid} is already in the filter table at entry {entry}")]
    AlreadyRegistered {
        /// The duplicate MID
        mid: MessageId,
        /// Entry that already holds it
        entry: usize,
    },

    /// MID has no filter table entry
    #[error("MID {mid} is not in the filter table")]
    NotRegistered {
        /// The missing MID
        mid: MessageId,
    },

    /// Filter table has no unused entries
    #[error("filter table is full ({capacity} entries)")]
    TableFull {
        /// Table capacity
        capacity: usize,
    },

    /// MID index already holds a mapping for this key
    #[error("MID index already maps {mid}")]
    DuplicateMid {
        /// The duplicate key
        mid: MessageId,
    },

    /// Entry index out of range
    #[error("filter entry index {index} out of range (table has {len} entries)")]
    InvalidEntry {
        /// Offending index
        index: usize,
        /// Table length
        len: usize,
    },

    /// Filter slot index out of range
    #[error("filter slot index {index} out of range (limit {limit})")]
    InvalidSlot {
        /// Offending index
        index: usize,
        /// Slots per entry
        limit: usize,
    },

    /// Algorithm parameters violate the (N, X, O) invariant
    #[error("invalid filter parameters: N = {n}, X = {x}, O = {o}")]
    InvalidParams {
        /// Packets to admit per block
        n: u16,
        /// Block length
        x: u16,
        /// Phase offset
        o: u16,
    },
}

impl FilterError {
    /// Create an AlreadyRegistered error
    #[inline]
    pub fn already_registered(mid: MessageId, entry: usize) -> Self {
        Self::AlreadyRegistered { mid, entry }
    }

    /// Create a NotRegistered error
    #[inline]
    pub fn not_registered(mid: MessageId) -> Self {
        Self::NotRegistered { mid }
    }

    /// Create an InvalidSlot error
    #[inline]
    pub fn invalid_slot(index: usize, limit: usize) -> Self {
        Self::InvalidSlot { index, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_registered_names_mid() {
        let err = FilterError::already_registered(MessageId::new(0x08A1), 3);
        assert!(err.to_string().contains("0x08A1"));
        assert!(err.to_string().contains("entry 3"));
    }

    #[test]
    fn test_not_registered_names_mid() {
        let err = FilterError::not_registered(MessageId::new(0x0001));
        assert!(err.to_string().contains("0x0001"));
        assert!(err.to_string().contains("not in the filter table"));
    }

    #[test]
    fn test_table_full_names_capacity() {
        let err = FilterError::TableFull { capacity: 256 };
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_invalid_params_names_all_three() {
        let err = FilterError::InvalidParams { n: 3, x: 2, o: 1 };
        let text = err.to_string();
        assert!(text.contains("N = 3"));
        assert!(text.contains("X = 2"));
        assert!(text.contains("O = 1"));
    }
}
