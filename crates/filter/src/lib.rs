//! packrat - Admission filtering
//!
//! Per-MID packet admission: a fixed-capacity filter table maps each
//! registered MID to a small set of filter slots, and each slot runs an
//! (N, X, O) duty-cycle algorithm against its own running occurrence
//! counter.
//!
//! # Design
//!
//! Admission decisions are made per packet, so the hot path is one hash
//! lookup (the MID index) plus a handful of integer operations per slot.
//! All allocations happen at registration time, never per packet.
//!
//! The MID index is rebuilt wholesale after any removal rather than
//! supporting in-place deletion: the table capacity is small and fixed,
//! removals happen only on operator command, and a full rebuild cannot
//! leave a stale mapping behind.
//!
//! # Example
//!
//! ```
//! use packrat_filter::{Decision, FilterParams, FilterTable};
//! use packrat_protocol::MessageId;
//!
//! let mut table = FilterTable::new();
//! let mid = MessageId::new(0x08A1);
//! table.register(mid).unwrap();
//!
//! // Admit 1 of every 2 packets to destination 0
//! table.set_params(mid, 0, FilterParams::new(1, 2, 0)).unwrap();
//!
//! let entry = table.lookup(mid).unwrap();
//! assert_eq!(table.evaluate(entry, 0, 0).unwrap(), Decision::Admit);
//! assert_eq!(table.evaluate(entry, 0, 0).unwrap(), Decision::Drop);
//! ```

mod error;
mod index;
mod table;

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

pub use error::{FilterError, Result};
pub use index::MidIndex;
pub use table::{
    Decision, FilterEntry, FilterKind, FilterParams, FilterSlot, FilterTable,
    FILTERS_PER_PACKET, PACKET_TABLE_CAPACITY,
};
