//! Engine command set
//!
//! Everything an operator can change at runtime. Commands arrive through
//! the same queue as packets, so each one executes between packets, never
//! during one.

use packrat_filter::{FilterKind, FilterParams};
use packrat_protocol::MessageId;
use packrat_storage::{EnableState, NameKind};

/// Operator commands accepted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a MID into the filter table
    AddMid(MessageId),

    /// Remove a MID from the filter table
    RemoveMid(MessageId),

    /// Point a filter slot at a destination file index
    SetFilterDest {
        /// Registered MID
        mid: MessageId,
        /// Filter slot index
        slot: usize,
        /// Destination file index
        dest: usize,
    },

    /// Change a filter slot's counter source
    SetFilterKind {
        /// Registered MID
        mid: MessageId,
        /// Filter slot index
        slot: usize,
        /// New counter source
        kind: FilterKind,
    },

    /// Change a filter slot's (N, X, O) parameters
    SetFilterParams {
        /// Registered MID
        mid: MessageId,
        /// Filter slot index
        slot: usize,
        /// New parameters
        params: FilterParams,
    },

    /// Change a destination's filename suffix style
    SetDestNaming {
        /// Destination file index
        dest: usize,
        /// New suffix style
        kind: NameKind,
    },

    /// Change a destination's directory
    SetDestPath {
        /// Destination file index
        dest: usize,
        /// New directory
        path: String,
    },

    /// Change a destination's filename stem
    SetDestBase {
        /// Destination file index
        dest: usize,
        /// New stem
        base: String,
    },

    /// Change a destination's filename extension
    SetDestExtension {
        /// Destination file index
        dest: usize,
        /// New extension
        extension: String,
    },

    /// Change a destination's size limit
    SetDestMaxSize {
        /// Destination file index
        dest: usize,
        /// New limit in bytes; 0 = unbounded
        limit: u32,
    },

    /// Change a destination's age limit
    SetDestMaxAge {
        /// Destination file index
        dest: usize,
        /// New limit in seconds; 0 = unbounded
        limit: u32,
    },

    /// Set a destination's next filename sequence count
    SetDestCount {
        /// Destination file index
        dest: usize,
        /// New sequence count
        count: u32,
    },

    /// Enable or disable a destination
    SetDestState {
        /// Destination file index
        dest: usize,
        /// New state
        state: EnableState,
    },

    /// Close one destination file
    CloseFile {
        /// Destination file index
        dest: usize,
    },

    /// Close every open destination file
    CloseAll,

    /// Enable or disable the whole engine
    SetEngineState(EnableState),

    /// Zero the packet and file I/O counters
    ResetCounters,
}
