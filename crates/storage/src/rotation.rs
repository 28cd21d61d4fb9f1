//! Rotation manager
//!
//! Drives the per-destination Closed/Open state machine:
//!
//! - Closed -> Open on the first admitted packet to an enabled destination
//! - Open -> Open on each append, rotating first when the write would push
//!   the file past its size limit
//! - Open -> Closed on age expiry (tick), explicit close, disable, or
//!   shutdown - always header-update-then-close
//!
//! The filename sequence count advances once per file open, so a restart
//! that restores the persisted count can never collide with a file written
//! before the restart.

use chrono::Utc;

use crate::dest::{compose_filename, DestFileTable, EnableState, MAX_SEQUENCE_COUNT};
use crate::error::{Result, StorageError};
use crate::header::{unix_now, FileHeader, HeaderCounts};
use crate::io::{is_handle_lost, FileIo};
use crate::status::{FileInfo, FileStatus};

/// File I/O counters, one instance per rotation manager
///
/// Plain fields: the engine is single-writer (one task owns the manager),
/// so no atomics are needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageMetrics {
    /// Packets appended to destination files
    pub file_writes: u64,
    /// Failed appends and failed opens
    pub write_errors: u64,
    /// Successful header updates at rotation/close
    pub header_updates: u64,
    /// Failed header updates
    pub header_errors: u64,
    /// Size-triggered rotations
    pub rotations: u64,
    /// Age-triggered closes
    pub age_closes: u64,
}

impl StorageMetrics {
    /// Reset all counters to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of routing one admitted packet to a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The packet was appended
    Written {
        /// A file was opened for this write (sequence count advanced)
        opened: bool,
        /// A size rotation preceded this write
        rotated: bool,
    },
    /// The destination is disabled; the packet was discarded
    DestinationDisabled,
}

/// Result of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    /// A file was actually open
    pub was_open: bool,
    /// The header update before close succeeded
    pub header_updated: bool,
}

impl CloseOutcome {
    const NOOP: Self = Self {
        was_open: false,
        header_updated: false,
    };
}

/// Per-destination file lifecycle state machine
///
/// Owns the file status registry and the I/O seam. The destination file
/// table is passed in per call so the caller keeps configuration ownership;
/// the manager mirrors sequence counts back into it whenever they advance.
pub struct RotationManager {
    io: Box<dyn FileIo>,
    status: Vec<FileStatus>,
    metrics: StorageMetrics,
}

impl RotationManager {
    /// Create a manager with one status row per table entry
    #[must_use]
    pub fn new(io: Box<dyn FileIo>, table: &DestFileTable) -> Self {
        let status = table
            .iter()
            .map(|(_, entry)| FileStatus::new(entry.sequence_count, entry.enable_state))
            .collect();
        Self {
            io,
            status,
            metrics: StorageMetrics::default(),
        }
    }

    /// Current file I/O counters
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> StorageMetrics {
        self.metrics
    }

    /// Reset the file I/O counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Borrow one status row
    #[inline]
    pub fn status(&self, dest: usize) -> Option<&FileStatus> {
        self.status.get(dest)
    }

    /// Number of currently open destination files
    pub fn open_count(&self) -> usize {
        self.status.iter().filter(|s| s.is_open()).count()
    }

    /// Status snapshot for every destination index
    #[must_use]
    pub fn file_info(&self) -> Vec<FileInfo> {
        self.status.iter().map(FileInfo::from).collect()
    }

    /// Append one admitted packet to a destination
    ///
    /// Opens the destination's file if none is open, and rotates first if
    /// the append would exceed the size limit - the triggering write always
    /// lands in the freshly rotated file.
    ///
    /// # Errors
    ///
    /// `InvalidDest` for a bad index; `Open`/`Write`/`HandleLost` for I/O
    /// failures, all local to this destination. After an error the state
    /// machine is consistent: open failures leave it Closed, transient
    /// write failures leave it Open, handle loss forces it Closed.
    pub fn write_packet(
        &mut self,
        table: &mut DestFileTable,
        dest: usize,
        frame: &[u8],
    ) -> Result<WriteOutcome> {
        let max_size = table.get(dest)?.max_size;
        if dest >= self.status.len() {
            return Err(StorageError::invalid_dest(dest, self.status.len()));
        }
        if !self.status[dest].state.is_enabled() {
            return Ok(WriteOutcome::DestinationDisabled);
        }

        let len = frame.len() as u32;
        let mut rotated = false;
        if self.status[dest].is_open()
            && max_size > 0
            && self.status[dest].size.saturating_add(len) > max_size
        {
            self.finalize(dest);
            self.metrics.rotations += 1;
            self.open_dest(table, dest)?;
            rotated = true;
        }

        let mut opened = rotated;
        if !self.status[dest].is_open() {
            self.open_dest(table, dest)?;
            opened = true;
        }

        self.append(dest, frame)?;
        Ok(WriteOutcome::Written { opened, rotated })
    }

    /// Advance file ages and growth rates; close files past their age limit
    ///
    /// Called periodically, never per packet. Returns the number of files
    /// closed for age; each reopens on its next admitted packet.
    pub fn tick(&mut self, table: &DestFileTable, elapsed_secs: u32) -> usize {
        let mut closed = 0;

        for dest in 0..self.status.len() {
            let age = {
                let status = &mut self.status[dest];
                if !status.is_open() {
                    status.growth_rate = 0;
                    continue;
                }

                status.age_secs = status.age_secs.saturating_add(elapsed_secs);
                if elapsed_secs > 0 {
                    status.growth_rate = status.growth_bytes / elapsed_secs;
                    status.growth_bytes = 0;
                }
                status.age_secs
            };

            let Ok(entry) = table.get(dest) else { continue };
            if entry.max_age > 0 && age > entry.max_age {
                tracing::info!(dest, age, limit = entry.max_age, "age limit reached");
                self.finalize(dest);
                self.metrics.age_closes += 1;
                closed += 1;
            }
        }

        closed
    }

    /// Close one destination file if it is open
    ///
    /// # Errors
    ///
    /// `InvalidDest` for a bad index. A failed header update does not stop
    /// the close; it is reported in the outcome and counted.
    pub fn close(&mut self, dest: usize) -> Result<CloseOutcome> {
        if dest >= self.status.len() {
            return Err(StorageError::invalid_dest(dest, self.status.len()));
        }
        Ok(self.finalize(dest))
    }

    /// Close every open destination file
    ///
    /// Returns the number of files that were open.
    pub fn close_all(&mut self) -> usize {
        (0..self.status.len())
            .filter(|&dest| self.finalize(dest).was_open)
            .count()
    }

    /// Set a destination's enable state in table and status
    ///
    /// Disabling closes any open file (header updated); a disabled
    /// destination never reopens until re-enabled.
    ///
    /// # Errors
    ///
    /// `InvalidDest` for a bad index.
    pub fn set_state(
        &mut self,
        table: &mut DestFileTable,
        dest: usize,
        state: EnableState,
    ) -> Result<CloseOutcome> {
        table.get_mut(dest)?.enable_state = state;
        self.status[dest].state = state;

        if state.is_enabled() {
            Ok(CloseOutcome::NOOP)
        } else {
            Ok(self.finalize(dest))
        }
    }

    /// Set a destination's next filename sequence count in table and status
    ///
    /// # Errors
    ///
    /// `InvalidDest` for a bad index.
    pub fn set_sequence_count(
        &mut self,
        table: &mut DestFileTable,
        dest: usize,
        count: u32,
    ) -> Result<()> {
        table.get_mut(dest)?.sequence_count = count;
        self.status[dest].sequence_count = count;
        Ok(())
    }

    /// Compose a filename, create the file, record the handle
    ///
    /// The filename uses the current sequence count; on success the count
    /// advances so the next file (and a restart restoring the persisted
    /// count) gets a fresh name.
    fn open_dest(&mut self, table: &mut DestFileTable, dest: usize) -> Result<()> {
        let entry = table.get(dest)?;
        let sequence = self.status[dest].sequence_count;
        let path = compose_filename(entry, sequence, Utc::now());
        let header = FileHeader {
            dest_index: dest as u16,
            sequence_count: sequence,
            opened_secs: unix_now(),
        };

        match self.io.open(&path, &header) {
            Ok(writer) => {
                let status = &mut self.status[dest];
                status.writer = Some(writer);
                status.name = path.display().to_string();
                status.size = 0;
                status.age_secs = 0;
                status.records = 0;
                status.sequence_count = next_sequence(sequence);
                table.get_mut(dest)?.sequence_count = status.sequence_count;

                tracing::info!(dest, file = %status.name, sequence, "destination file opened");
                Ok(())
            }
            Err(source) => {
                self.metrics.write_errors += 1;
                tracing::error!(
                    dest,
                    path = %path.display(),
                    error = %source,
                    "destination file open failed"
                );
                Err(StorageError::Open {
                    dest,
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    /// Append a frame to the open file, updating size and counters
    fn append(&mut self, dest: usize, frame: &[u8]) -> Result<()> {
        let status = &mut self.status[dest];
        let Some(writer) = status.writer.as_mut() else {
            // callers open before appending
            return Err(StorageError::Write {
                dest,
                source: std::io::Error::from(std::io::ErrorKind::NotConnected),
            });
        };

        match writer.append(frame) {
            Ok(()) => {
                status.size = status.size.saturating_add(frame.len() as u32);
                status.records += 1;
                status.growth_bytes = status.growth_bytes.saturating_add(frame.len() as u32);
                self.metrics.file_writes += 1;
                Ok(())
            }
            Err(source) if is_handle_lost(&source) => {
                self.metrics.write_errors += 1;
                tracing::error!(dest, error = %source, "file handle lost, forcing close");
                status.clear_open_file();
                Err(StorageError::HandleLost { dest, source })
            }
            Err(source) => {
                self.metrics.write_errors += 1;
                tracing::warn!(dest, error = %source, "write failed, file stays open");
                Err(StorageError::Write { dest, source })
            }
        }
    }

    /// Update the header, close the file, clear the status row
    fn finalize(&mut self, dest: usize) -> CloseOutcome {
        let status = &mut self.status[dest];
        let Some(mut writer) = status.writer.take() else {
            return CloseOutcome::NOOP;
        };

        let counts = HeaderCounts {
            records: status.records,
            bytes: status.size,
            closed_secs: unix_now(),
        };
        let header_updated = match writer.update_header(&counts) {
            Ok(()) => {
                self.metrics.header_updates += 1;
                true
            }
            Err(e) => {
                self.metrics.header_errors += 1;
                tracing::warn!(dest, error = %e, "header update failed at close");
                false
            }
        };

        if let Err(e) = writer.finish() {
            tracing::warn!(dest, error = %e, "destination file close failed");
        }

        let name = std::mem::take(&mut self.status[dest].name);
        self.status[dest].clear_open_file();

        tracing::info!(
            dest,
            file = %name,
            records = counts.records,
            bytes = counts.bytes,
            "destination file closed"
        );

        CloseOutcome {
            was_open: true,
            header_updated,
        }
    }
}

impl std::fmt::Debug for RotationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationManager")
            .field("destinations", &self.status.len())
            .field("open", &self.open_count())
            .finish()
    }
}

/// Advance a filename sequence count, wrapping at the eight-digit ceiling
#[inline]
fn next_sequence(sequence: u32) -> u32 {
    if sequence >= MAX_SEQUENCE_COUNT {
        0
    } else {
        sequence + 1
    }
}
