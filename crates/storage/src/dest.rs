//! Destination file table
//!
//! Pure configuration: one entry per destination file index, describing how
//! its files are named and when they rotate. The runtime side (open handle,
//! size, age) lives in the file status registry.
//!
//! The `verify_*` predicates are for the command and configuration layers.
//! Once a configuration is activated the engine trusts it - the per-packet
//! path performs no range checks on stored configuration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{Result, StorageError};

/// Destination file table capacity
pub const DEST_FILE_COUNT: usize = 16;

/// Smallest accepted non-zero size limit in bytes
pub const MIN_SIZE_LIMIT: u32 = 64;

/// Smallest accepted non-zero age limit in seconds
pub const MIN_AGE_LIMIT: u32 = 10;

/// Largest filename sequence count (eight decimal digits)
pub const MAX_SEQUENCE_COUNT: u32 = 99_999_999;

/// Destination enable/disable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableState {
    /// Destination accepts admitted packets
    Enabled,
    /// Admitted packets for this destination are discarded
    Disabled,
}

impl EnableState {
    /// True for `Enabled`
    #[inline]
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Filename suffix style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Eight-digit sequence count suffix
    Count,
    /// UTC timestamp suffix (`%Y%j%H%M%S`: year, day-of-year, time)
    Time,
}

/// Configuration for one destination file index
#[derive(Debug, Clone)]
pub struct DestFileEntry {
    /// Directory the files are written into
    pub pathname: String,
    /// Filename stem
    pub basename: String,
    /// Filename extension (leading dot optional)
    pub extension: String,
    /// Filename suffix style
    pub name_kind: NameKind,
    /// Size limit in bytes; 0 = unbounded
    pub max_size: u32,
    /// Age limit in seconds; 0 = unbounded
    pub max_age: u32,
    /// Next filename sequence count
    pub sequence_count: u32,
    /// Enable/disable state
    pub enable_state: EnableState,
}

impl Default for DestFileEntry {
    fn default() -> Self {
        Self {
            pathname: String::new(),
            basename: String::new(),
            extension: String::new(),
            name_kind: NameKind::Count,
            max_size: 0,
            max_age: 0,
            sequence_count: 0,
            enable_state: EnableState::Disabled,
        }
    }
}

/// Fixed-capacity destination file table
#[derive(Debug, Clone)]
pub struct DestFileTable {
    files: Vec<DestFileEntry>,
}

impl Default for DestFileTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DestFileTable {
    /// Create a table of default (disabled) entries at full capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEST_FILE_COUNT)
    }

    /// Create a table with a specific capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: vec![DestFileEntry::default(); capacity],
        }
    }

    /// Table capacity
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if the table has no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Borrow an entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidDest` if the index is out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&DestFileEntry> {
        self.files
            .get(index)
            .ok_or_else(|| StorageError::invalid_dest(index, self.files.len()))
    }

    /// Mutably borrow an entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidDest` if the index is out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut DestFileEntry> {
        let len = self.files.len();
        self.files
            .get_mut(index)
            .ok_or_else(|| StorageError::invalid_dest(index, len))
    }

    /// Iterate entries with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DestFileEntry)> {
        self.files.iter().enumerate()
    }
}

/// Check a destination file index against the table capacity
#[inline]
#[must_use]
pub fn verify_index(index: usize, len: usize) -> bool {
    index < len
}

/// Check a size limit: zero (unbounded) or at least the minimum
#[inline]
#[must_use]
pub fn verify_size(limit: u32) -> bool {
    limit == 0 || limit >= MIN_SIZE_LIMIT
}

/// Check an age limit: zero (unbounded) or at least the minimum
#[inline]
#[must_use]
pub fn verify_age(limit: u32) -> bool {
    limit == 0 || limit >= MIN_AGE_LIMIT
}

/// Check a filename sequence count against the eight-digit field
#[inline]
#[must_use]
pub fn verify_count(count: u32) -> bool {
    count <= MAX_SEQUENCE_COUNT
}

/// Compose the filename for a destination file
///
/// Count naming appends an eight-digit sequence count to the basename;
/// time naming appends a UTC `%Y%j%H%M%S` stamp. A missing leading dot on
/// the extension is supplied.
#[must_use]
pub fn compose_filename(
    entry: &DestFileEntry,
    sequence: u32,
    now: DateTime<Utc>,
) -> PathBuf {
    let suffix = match entry.name_kind {
        NameKind::Count => format!("{sequence:08}"),
        NameKind::Time => now.format("%Y%j%H%M%S").to_string(),
    };

    let mut name = format!("{}{}", entry.basename, suffix);
    if !entry.extension.is_empty() {
        if !entry.extension.starts_with('.') {
            name.push('.');
        }
        name.push_str(&entry.extension);
    }

    PathBuf::from(&entry.pathname).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> DestFileEntry {
        DestFileEntry {
            pathname: "/data/rec".into(),
            basename: "tlm".into(),
            extension: ".pkt".into(),
            ..DestFileEntry::default()
        }
    }

    #[test]
    fn test_compose_count_name() {
        let path = compose_filename(&entry(), 42, Utc::now());
        assert_eq!(path, PathBuf::from("/data/rec/tlm00000042.pkt"));
    }

    #[test]
    fn test_compose_supplies_extension_dot() {
        let mut e = entry();
        e.extension = "pkt".into();
        let path = compose_filename(&e, 1, Utc::now());
        assert_eq!(path, PathBuf::from("/data/rec/tlm00000001.pkt"));
    }

    #[test]
    fn test_compose_time_name() {
        let mut e = entry();
        e.name_kind = NameKind::Time;
        let when = Utc.with_ymd_and_hms(2026, 2, 1, 3, 4, 5).unwrap();
        let path = compose_filename(&e, 0, when);
        // 2026, day-of-year 032, 03:04:05
        assert_eq!(path, PathBuf::from("/data/rec/tlm2026032030405.pkt"));
    }

    #[test]
    fn test_compose_empty_extension() {
        let mut e = entry();
        e.extension = String::new();
        let path = compose_filename(&e, 7, Utc::now());
        assert_eq!(path, PathBuf::from("/data/rec/tlm00000007"));
    }

    #[test]
    fn test_table_index_range() {
        let mut table = DestFileTable::with_capacity(2);
        assert!(table.get(1).is_ok());
        assert!(matches!(
            table.get(2),
            Err(StorageError::InvalidDest { index: 2, len: 2 })
        ));
        assert!(table.get_mut(2).is_err());
    }

    #[test]
    fn test_verify_predicates() {
        assert!(verify_size(0));
        assert!(!verify_size(MIN_SIZE_LIMIT - 1));
        assert!(verify_size(MIN_SIZE_LIMIT));

        assert!(verify_age(0));
        assert!(!verify_age(MIN_AGE_LIMIT - 1));
        assert!(verify_age(MIN_AGE_LIMIT));

        assert!(verify_count(MAX_SEQUENCE_COUNT));
        assert!(!verify_count(MAX_SEQUENCE_COUNT + 1));

        assert!(verify_index(15, 16));
        assert!(!verify_index(16, 16));
    }
}
