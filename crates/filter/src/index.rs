//! MID index for O(1) MID to filter-entry lookup
//!
//! The index holds back-references only: the filter table owns the entries,
//! the index maps a MID to its entry position. After a removal the index is
//! rebuilt from the table contents instead of deleting in place, so a stale
//! mapping can never survive.

use std::collections::HashMap;

use packrat_protocol::MessageId;

use crate::error::{FilterError, Result};
use crate::table::FilterEntry;

/// Hash index mapping MID to filter-table entry index
#[derive(Debug, Clone, Default)]
pub struct MidIndex {
    map: HashMap<MessageId, usize>,
}

impl MidIndex {
    /// Create an empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index with pre-allocated capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Look up the filter-table entry for a MID
    ///
    /// This is the per-packet path: one hash lookup, no allocation.
    #[inline]
    pub fn lookup(&self, mid: MessageId) -> Option<usize> {
        self.map.get(&mid).copied()
    }

    /// Add a mapping for a newly registered MID
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMid` if the MID is already mapped. The index is
    /// left unchanged.
    pub fn insert(&mut self, mid: MessageId, entry: usize) -> Result<()> {
        if self.map.contains_key(&mid) {
            return Err(FilterError::DuplicateMid { mid });
        }
        self.map.insert(mid, entry);
        Ok(())
    }

    /// Discard and reconstruct the index from the filter table contents
    ///
    /// Called after any removal. Cost is O(table capacity), which is small
    /// and fixed; removals are rare relative to lookups.
    pub fn rebuild(&mut self, entries: &[FilterEntry]) {
        self.map.clear();
        for (position, entry) in entries.iter().enumerate() {
            if let Some(mid) = entry.mid() {
                self.map.insert(mid, position);
            }
        }
    }

    /// Number of mapped MIDs
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no MIDs are mapped
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut index = MidIndex::new();
        index.insert(MessageId::new(0x08A1), 7).unwrap();

        assert_eq!(index.lookup(MessageId::new(0x08A1)), Some(7));
        assert_eq!(index.lookup(MessageId::new(0x08A2)), None);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let mut index = MidIndex::new();
        index.insert(MessageId::new(1), 0).unwrap();

        let err = index.insert(MessageId::new(1), 5).unwrap_err();
        assert_eq!(
            err,
            FilterError::DuplicateMid {
                mid: MessageId::new(1)
            }
        );
        // Original mapping untouched
        assert_eq!(index.lookup(MessageId::new(1)), Some(0));
    }

    #[test]
    fn test_rebuild_from_entries() {
        let mut entries = vec![FilterEntry::default(); 4];
        entries[1].set_mid(Some(MessageId::new(0x0100)));
        entries[3].set_mid(Some(MessageId::new(0x0200)));

        let mut index = MidIndex::new();
        index.insert(MessageId::new(0x0999), 0).unwrap();

        index.rebuild(&entries);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(MessageId::new(0x0100)), Some(1));
        assert_eq!(index.lookup(MessageId::new(0x0200)), Some(3));
        assert_eq!(index.lookup(MessageId::new(0x0999)), None);
    }

    #[test]
    fn test_rebuild_empty_table() {
        let mut index = MidIndex::new();
        index.insert(MessageId::new(1), 0).unwrap();

        index.rebuild(&[]);
        assert!(index.is_empty());
    }
}
