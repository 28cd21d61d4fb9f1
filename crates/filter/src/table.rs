//! Filter table and duty-cycle evaluator
//!
//! The filter table is a fixed-capacity arena of per-MID entries. Each
//! entry carries [`FILTERS_PER_PACKET`] independent filter slots, so one
//! packet stream can feed several destination files under different duty
//! cycles at once. Slots are always evaluated independently - an earlier
//! slot's decision never short-circuits a later one.
//!
//! The admission algorithm is deterministic and clock-free for count-based
//! slots: with parameters (N, X, O) and running count `c`, a packet is
//! admitted iff `(c + O) mod X < N`. Replaying the same input sequence
//! reproduces the same decisions exactly. Time-based slots run the same
//! formula against the packet's embedded timestamp seconds instead of the
//! running count.

use packrat_protocol::MessageId;

use crate::error::{FilterError, Result};
use crate::index::MidIndex;

/// Independent filter slots per registered MID
pub const FILTERS_PER_PACKET: usize = 4;

/// Default filter table capacity
pub const PACKET_TABLE_CAPACITY: usize = 256;

/// Counter source for a filter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Duty cycle over the slot's running occurrence counter
    ByCount,
    /// Duty cycle over the packet's embedded timestamp seconds
    ByTime,
}

/// Duty-cycle algorithm parameters
///
/// Admits N out of every cyclic block of X occurrences, phase-shifted by O.
/// Invariant: `x > 0`, `n <= x`, `o < x` - enforced before the parameters
/// reach a table slot, never re-checked per packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    /// Packets admitted per block
    pub n: u16,
    /// Block length
    pub x: u16,
    /// Phase offset
    pub o: u16,
}

impl FilterParams {
    /// Admit nothing: 0 of every 1
    pub const DROP_ALL: Self = Self { n: 0, x: 1, o: 0 };

    /// Admit everything: 1 of every 1
    pub const PASS_ALL: Self = Self { n: 1, x: 1, o: 0 };

    /// Create parameters without validation
    #[inline]
    #[must_use]
    pub const fn new(n: u16, x: u16, o: u16) -> Self {
        Self { n, x, o }
    }

    /// Check the (N, X, O) invariant
    #[inline]
    #[must_use]
    pub fn verify(self) -> bool {
        self.x > 0 && self.n <= self.x && self.o < self.x
    }

    /// Apply the admission formula to a counter value
    #[inline]
    fn admit(self, counter: u32) -> bool {
        let phase = counter.wrapping_add(u32::from(self.o)) % u32::from(self.x);
        phase < u32::from(self.n)
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::DROP_ALL
    }
}

/// One filter slot: destination file plus algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSlot {
    /// Destination file table index
    pub dest: usize,
    /// Counter source
    pub kind: FilterKind,
    /// Duty-cycle parameters
    pub params: FilterParams,
}

impl Default for FilterSlot {
    fn default() -> Self {
        Self {
            dest: 0,
            kind: FilterKind::ByCount,
            params: FilterParams::DROP_ALL,
        }
    }
}

/// Per-packet admission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Write the packet to the slot's destination
    Admit,
    /// Discard the packet for this slot
    Drop,
}

impl Decision {
    /// True for `Admit`
    #[inline]
    #[must_use]
    pub fn is_admit(self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// One filter table entry: a MID and its slots
///
/// An entry with `mid == None` is unused and available for registration.
/// The running counts advance independently per slot, one increment per
/// evaluation, wrapping deterministically at `u32::MAX`.
#[derive(Debug, Clone, Default)]
pub struct FilterEntry {
    mid: Option<MessageId>,
    slots: [FilterSlot; FILTERS_PER_PACKET],
    counts: [u32; FILTERS_PER_PACKET],
}

impl FilterEntry {
    /// The registered MID, or `None` for an unused entry
    #[inline]
    #[must_use]
    pub fn mid(&self) -> Option<MessageId> {
        self.mid
    }

    /// The entry's filter slots
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[FilterSlot; FILTERS_PER_PACKET] {
        &self.slots
    }

    /// Running occurrence count for one slot
    #[inline]
    #[must_use]
    pub fn count(&self, slot: usize) -> u32 {
        self.counts[slot]
    }

    pub(crate) fn set_mid(&mut self, mid: Option<MessageId>) {
        self.mid = mid;
    }

    /// Reset slots and counts to defaults, keeping the MID field
    fn reset_slots(&mut self) {
        self.slots = [FilterSlot::default(); FILTERS_PER_PACKET];
        self.counts = [0; FILTERS_PER_PACKET];
    }
}

/// Fixed-capacity filter table with its MID index
///
/// Owns the entries exclusively; the index holds entry positions only.
/// All mutation goes through the registration and `set_*` methods so the
/// index can never disagree with the table.
#[derive(Debug, Clone)]
pub struct FilterTable {
    entries: Vec<FilterEntry>,
    index: MidIndex,
}

impl Default for FilterTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterTable {
    /// Create a table with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(PACKET_TABLE_CAPACITY)
    }

    /// Create a table with a specific capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![FilterEntry::default(); capacity],
            index: MidIndex::with_capacity(capacity),
        }
    }

    /// Table capacity (used + unused entries)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of registered MIDs
    #[inline]
    pub fn registered(&self) -> usize {
        self.index.len()
    }

    /// Look up the entry index for a MID
    #[inline]
    pub fn lookup(&self, mid: MessageId) -> Option<usize> {
        self.index.lookup(mid)
    }

    /// Borrow an entry by index
    #[inline]
    pub fn entry(&self, index: usize) -> Option<&FilterEntry> {
        self.entries.get(index)
    }

    /// Register a MID into the first unused entry
    ///
    /// The new entry's slots start as drop-everything filters aimed at
    /// destination 0; counts start at zero.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRegistered` if the MID has an entry, `TableFull` if
    /// no unused entry exists. The table and index are unchanged on error.
    pub fn register(&mut self, mid: MessageId) -> Result<usize> {
        if let Some(entry) = self.index.lookup(mid) {
            return Err(FilterError::already_registered(mid, entry));
        }

        let position = self
            .entries
            .iter()
            .position(|entry| entry.mid().is_none())
            .ok_or(FilterError::TableFull {
                capacity: self.entries.len(),
            })?;

        let entry = &mut self.entries[position];
        entry.set_mid(Some(mid));
        entry.reset_slots();
        self.index.insert(mid, position)?;

        tracing::debug!(%mid, entry = position, "registered MID in filter table");
        Ok(position)
    }

    /// Remove a MID, resetting its entry and rebuilding the index
    ///
    /// # Errors
    ///
    /// Returns `NotRegistered` if the MID has no entry.
    pub fn unregister(&mut self, mid: MessageId) -> Result<usize> {
        let position = self
            .index
            .lookup(mid)
            .ok_or_else(|| FilterError::not_registered(mid))?;

        let entry = &mut self.entries[position];
        entry.set_mid(None);
        entry.reset_slots();
        self.index.rebuild(&self.entries);

        tracing::debug!(%mid, entry = position, "removed MID from filter table");
        Ok(position)
    }

    /// Point a slot at a different destination file
    ///
    /// Changing the destination resets the slot's running count: the new
    /// destination's duty cycle must not inherit phase from the old one.
    ///
    /// # Errors
    ///
    /// Returns `NotRegistered` or `InvalidSlot` on bad input.
    pub fn set_destination(&mut self, mid: MessageId, slot: usize, dest: usize) -> Result<()> {
        let (entry, slot) = self.slot_mut(mid, slot)?;
        if self.entries[entry].slots[slot].dest != dest {
            self.entries[entry].slots[slot].dest = dest;
            self.entries[entry].counts[slot] = 0;
        }
        Ok(())
    }

    /// Change a slot's counter source
    ///
    /// The running count is preserved; only the counter source changes.
    ///
    /// # Errors
    ///
    /// Returns `NotRegistered` or `InvalidSlot` on bad input.
    pub fn set_kind(&mut self, mid: MessageId, slot: usize, kind: FilterKind) -> Result<()> {
        let (entry, slot) = self.slot_mut(mid, slot)?;
        self.entries[entry].slots[slot].kind = kind;
        Ok(())
    }

    /// Change a slot's (N, X, O) parameters
    ///
    /// The running count is preserved: re-tuning a threshold mid-stream
    /// must not restart the duty cycle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` if the invariant fails, `NotRegistered` or
    /// `InvalidSlot` on bad addressing. No state changes on error.
    pub fn set_params(&mut self, mid: MessageId, slot: usize, params: FilterParams) -> Result<()> {
        if !params.verify() {
            return Err(FilterError::InvalidParams {
                n: params.n,
                x: params.x,
                o: params.o,
            });
        }
        let (entry, slot) = self.slot_mut(mid, slot)?;
        self.entries[entry].slots[slot].params = params;
        Ok(())
    }

    /// Evaluate one slot against the next packet occurrence
    ///
    /// `time_secs` is the packet's embedded timestamp; it feeds the formula
    /// only for `ByTime` slots. The slot's running count advances by one on
    /// every call regardless of kind or decision.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntry` or `InvalidSlot` on out-of-range input.
    pub fn evaluate(&mut self, entry: usize, slot: usize, time_secs: u32) -> Result<Decision> {
        if entry >= self.entries.len() {
            return Err(FilterError::InvalidEntry {
                index: entry,
                len: self.entries.len(),
            });
        }
        if slot >= FILTERS_PER_PACKET {
            return Err(FilterError::invalid_slot(slot, FILTERS_PER_PACKET));
        }

        let record = &mut self.entries[entry];
        let filter = record.slots[slot];
        let counter = match filter.kind {
            FilterKind::ByCount => record.counts[slot],
            FilterKind::ByTime => time_secs,
        };
        record.counts[slot] = record.counts[slot].wrapping_add(1);

        if filter.params.admit(counter) {
            Ok(Decision::Admit)
        } else {
            Ok(Decision::Drop)
        }
    }

    /// Iterate registered MIDs
    pub fn mids(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.entries.iter().filter_map(FilterEntry::mid)
    }

    #[cfg(test)]
    pub(crate) fn force_count(&mut self, entry: usize, slot: usize, value: u32) {
        self.entries[entry].counts[slot] = value;
    }

    /// Resolve (mid, slot) to indices, validating both
    fn slot_mut(&mut self, mid: MessageId, slot: usize) -> Result<(usize, usize)> {
        let entry = self
            .index
            .lookup(mid)
            .ok_or_else(|| FilterError::not_registered(mid))?;
        if slot >= FILTERS_PER_PACKET {
            return Err(FilterError::invalid_slot(slot, FILTERS_PER_PACKET));
        }
        Ok((entry, slot))
    }
}
