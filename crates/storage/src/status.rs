//! File status registry
//!
//! Runtime state for each destination file index, 1:1 with the destination
//! file table but independently lived: the table is configuration, this is
//! what the engine has actually done with it.

use std::fmt;

use crate::dest::EnableState;
use crate::io::DestWrite;

/// Open/closed state for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    /// A file is open for this destination
    Open,
    /// No file is open
    Closed,
}

/// Runtime state for one destination file index
///
/// `writer` is the open handle. It exists from open until close and is
/// exclusively owned here - the rotation manager takes it out to finish it
/// and never hands it to anyone else.
pub struct FileStatus {
    /// Open handle, present only while a file is open
    pub(crate) writer: Option<Box<dyn DestWrite>>,
    /// Composed name of the open file (empty when closed)
    pub name: String,
    /// Bytes in the open file, header included
    pub size: u32,
    /// Seconds since the open file was created (tick-driven)
    pub age_secs: u32,
    /// Bytes per rate interval, recomputed periodically
    pub growth_rate: u32,
    /// Bytes written since the last rate recomputation
    pub(crate) growth_bytes: u32,
    /// Packets written to the open file
    pub records: u32,
    /// Next filename sequence count
    pub sequence_count: u32,
    /// Runtime enable state (mirrors the table entry)
    pub state: EnableState,
}

impl FileStatus {
    /// Create a closed status row
    #[must_use]
    pub fn new(sequence_count: u32, state: EnableState) -> Self {
        Self {
            writer: None,
            name: String::new(),
            size: 0,
            age_secs: 0,
            growth_rate: 0,
            growth_bytes: 0,
            records: 0,
            sequence_count,
            state,
        }
    }

    /// True while a file is open for this destination
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Open/closed state for telemetry
    #[inline]
    #[must_use]
    pub fn open_state(&self) -> OpenState {
        if self.is_open() {
            OpenState::Open
        } else {
            OpenState::Closed
        }
    }

    /// Reset the per-file fields after a close
    pub(crate) fn clear_open_file(&mut self) {
        self.writer = None;
        self.name.clear();
        self.size = 0;
        self.age_secs = 0;
        self.growth_rate = 0;
        self.growth_bytes = 0;
        self.records = 0;
    }
}

impl fmt::Debug for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStatus")
            .field("open", &self.is_open())
            .field("name", &self.name)
            .field("size", &self.size)
            .field("age_secs", &self.age_secs)
            .field("sequence_count", &self.sequence_count)
            .field("state", &self.state)
            .finish()
    }
}

/// Point-in-time file status row for operators
///
/// Served by the engine's file-info request: one row per destination index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Seconds since the open file was created
    pub age_secs: u32,
    /// Bytes in the open file
    pub size: u32,
    /// Bytes per rate interval
    pub growth_rate: u32,
    /// Next filename sequence count
    pub sequence_count: u32,
    /// Enable/disable state
    pub enable_state: EnableState,
    /// Open/closed state
    pub open_state: OpenState,
    /// Name of the open file (empty when closed)
    pub name: String,
}

impl From<&FileStatus> for FileInfo {
    fn from(status: &FileStatus) -> Self {
        Self {
            age_secs: status.age_secs,
            size: status.size,
            growth_rate: status.growth_rate,
            sequence_count: status.sequence_count,
            enable_state: status.state,
            open_state: status.open_state(),
            name: status.name.clone(),
        }
    }
}
