//! Packet and command counters
//!
//! Plain fields, no atomics: the engine is single-writer by design, and
//! the counters travel in status snapshots.

/// Engine-level counters
///
/// The packet counters are mutually exclusive per packet, so operators can
/// distinguish "engine was off" from "no filter entry" from "filtered out"
/// from "written somewhere". Packets admitted to a disabled destination
/// are additionally counted in `dest_disabled`, one per affected slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketCounters {
    /// Commands applied successfully
    pub cmd_accepted: u64,
    /// Commands rejected with an error
    pub cmd_rejected: u64,
    /// Packets discarded because the engine was disabled
    pub disabled: u64,
    /// Packets with no filter table entry
    pub ignored: u64,
    /// Packets dropped by every filter slot
    pub filtered: u64,
    /// Packets admitted by at least one filter slot
    pub passed: u64,
    /// Admissions discarded because the destination was disabled
    pub dest_disabled: u64,
}

impl PacketCounters {
    /// Reset all counters to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
