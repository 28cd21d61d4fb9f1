//! Engine facade
//!
//! Owns every table and drives the full per-packet path. Constructed from
//! a validated configuration, so there is no "table not loaded" state to
//! check per packet - construction is the activation boundary.

use packrat_config::{Config, FilterKindConfig, NamingConfig};
use packrat_filter::{FilterKind, FilterParams, FilterTable, FILTERS_PER_PACKET};
use packrat_protocol::{MessageId, Packet};
use packrat_recovery::{DestRecord, RecoveryStore, Snapshot};
use packrat_storage::{
    verify_age, verify_count, verify_size, DestFileEntry, DestFileTable, EnableState, FileInfo,
    FileIo, NameKind, RotationManager, StorageMetrics, WriteOutcome,
};

use crate::bus::BusClient;
use crate::command::Command;
use crate::counters::PacketCounters;
use crate::error::{EngineError, Result};

/// The packet recorder engine
///
/// Single-writer: exactly one task calls into an `Engine`, one operation
/// at a time, so the tables need no synchronization.
pub struct Engine {
    state: EnableState,
    filter: FilterTable,
    dests: DestFileTable,
    rotation: RotationManager,
    recovery: Box<dyn RecoveryStore>,
    bus: Box<dyn BusClient>,
    counters: PacketCounters,
}

impl Engine {
    /// Activate a validated configuration
    ///
    /// Builds the filter and destination tables, restores the recovery
    /// snapshot (if one matches), and subscribes every configured MID.
    ///
    /// # Errors
    ///
    /// Returns an error only for configurations that slipped past
    /// validation (duplicate MIDs, out-of-range references).
    pub fn new(
        config: &Config,
        io: Box<dyn FileIo>,
        mut recovery: Box<dyn RecoveryStore>,
        mut bus: Box<dyn BusClient>,
    ) -> Result<Self> {
        let mut dests = build_dest_table(config);
        let mut state = if config.recorder.enabled {
            EnableState::Enabled
        } else {
            EnableState::Disabled
        };

        // Restore the snapshot before anything can open a file. A snapshot
        // that does not match the table shape is a cold start, not an error.
        match recovery.load() {
            Ok(Some(snapshot)) if snapshot.records.len() == dests.len() => {
                state = enable_state(snapshot.engine_enabled);
                for (dest, record) in snapshot.records.iter().enumerate() {
                    let entry = dests.get_mut(dest)?;
                    entry.enable_state = enable_state(record.enabled);
                    entry.sequence_count = record.sequence_count;
                }
                tracing::info!(records = snapshot.records.len(), "recovery snapshot restored");
            }
            Ok(Some(snapshot)) => {
                tracing::warn!(
                    records = snapshot.records.len(),
                    expected = dests.len(),
                    "recovery snapshot shape mismatch, using table defaults"
                );
            }
            Ok(None) => {
                tracing::info!("no recovery snapshot, cold start");
            }
            Err(e) => {
                tracing::warn!(error = %e, "recovery snapshot unreadable, using table defaults");
            }
        }

        let rotation = RotationManager::new(io, &dests);

        let mut filter = FilterTable::new();
        for packet in &config.packets {
            let mid = MessageId::new(packet.mid);
            filter.register(mid)?;
            for (slot, spec) in packet.filters.iter().enumerate() {
                filter.set_destination(mid, slot, spec.dest)?;
                filter.set_kind(mid, slot, filter_kind(spec.kind))?;
                filter.set_params(mid, slot, FilterParams::new(spec.n, spec.x, spec.o))?;
            }
            if let Err(e) = bus.subscribe(mid) {
                tracing::warn!(error = %e, "subscription failed at activation");
            }
        }

        tracing::info!(
            mids = filter.registered(),
            destinations = dests.len(),
            enabled = state.is_enabled(),
            "engine activated"
        );

        Ok(Self {
            state,
            filter,
            dests,
            rotation,
            recovery,
            bus,
            counters: PacketCounters::default(),
        })
    }

    /// Process one arrived packet
    ///
    /// Every filter slot of the packet's entry is evaluated independently;
    /// each admission routes the full frame to that slot's destination.
    pub fn handle_packet(&mut self, packet: &Packet) {
        if !self.state.is_enabled() {
            self.counters.disabled += 1;
            return;
        }

        let Some(entry) = self.filter.lookup(packet.mid()) else {
            self.counters.ignored += 1;
            return;
        };

        let mut admitted = false;
        for slot in 0..FILTERS_PER_PACKET {
            let Ok(decision) = self.filter.evaluate(entry, slot, packet.timestamp_secs()) else {
                continue;
            };
            if !decision.is_admit() {
                continue;
            }
            admitted = true;

            let Some(record) = self.filter.entry(entry) else {
                continue;
            };
            let dest = record.slots()[slot].dest;

            match self.rotation.write_packet(&mut self.dests, dest, packet.as_bytes()) {
                Ok(WriteOutcome::Written { opened, .. }) => {
                    // Opening (rotation included) advanced the sequence
                    // count; push it to the recovery store
                    if opened {
                        self.persist_state();
                    }
                }
                Ok(WriteOutcome::DestinationDisabled) => {
                    self.counters.dest_disabled += 1;
                }
                Err(e) => {
                    tracing::debug!(mid = %packet.mid(), dest, error = %e, "packet write failed");
                }
            }
        }

        if admitted {
            self.counters.passed += 1;
        } else {
            self.counters.filtered += 1;
        }
    }

    /// Apply one operator command
    ///
    /// # Errors
    ///
    /// The command's validation error; tables are untouched on error.
    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        // A counter reset zeroes the command counters themselves; counting
        // its own acceptance would undo half the reset
        let is_reset = matches!(command, Command::ResetCounters);
        match self.apply(command) {
            Ok(()) => {
                if !is_reset {
                    self.counters.cmd_accepted += 1;
                }
                Ok(())
            }
            Err(e) => {
                self.counters.cmd_rejected += 1;
                tracing::warn!(error = %e, "command rejected");
                Err(e)
            }
        }
    }

    /// Advance file ages and growth rates, closing over-age files
    pub fn tick(&mut self, elapsed_secs: u32) {
        let closed = self.rotation.tick(&self.dests, elapsed_secs);
        if closed > 0 {
            tracing::debug!(closed, "age tick closed files");
        }
    }

    /// Per-destination status rows
    #[must_use]
    pub fn file_info(&self) -> Vec<FileInfo> {
        self.rotation.file_info()
    }

    /// Engine-level packet and command counters
    #[must_use]
    pub fn counters(&self) -> PacketCounters {
        self.counters
    }

    /// File I/O counters from the rotation manager
    #[must_use]
    pub fn storage_metrics(&self) -> StorageMetrics {
        self.rotation.metrics()
    }

    /// Current engine enable state
    #[must_use]
    pub fn state(&self) -> EnableState {
        self.state
    }

    /// Close every file and push a final snapshot
    pub fn shutdown(&mut self) {
        let closed = self.rotation.close_all();
        self.persist_state();
        tracing::info!(closed, "engine shut down");
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::AddMid(mid) => {
                self.filter.register(mid)?;
                if let Err(e) = self.bus.subscribe(mid) {
                    tracing::warn!(error = %e, "subscribe failed");
                }
            }
            Command::RemoveMid(mid) => {
                self.filter.unregister(mid)?;
                if let Err(e) = self.bus.unsubscribe(mid) {
                    tracing::warn!(error = %e, "unsubscribe failed");
                }
            }
            Command::SetFilterDest { mid, slot, dest } => {
                // Reject dangling references before the table changes
                self.dests.get(dest)?;
                self.filter.set_destination(mid, slot, dest)?;
            }
            Command::SetFilterKind { mid, slot, kind } => {
                self.filter.set_kind(mid, slot, kind)?;
            }
            Command::SetFilterParams { mid, slot, params } => {
                self.filter.set_params(mid, slot, params)?;
            }
            Command::SetDestNaming { dest, kind } => {
                self.dests.get_mut(dest)?.name_kind = kind;
            }
            Command::SetDestPath { dest, path } => {
                self.dests.get_mut(dest)?.pathname = path;
            }
            Command::SetDestBase { dest, base } => {
                self.dests.get_mut(dest)?.basename = base;
            }
            Command::SetDestExtension { dest, extension } => {
                self.dests.get_mut(dest)?.extension = extension;
            }
            Command::SetDestMaxSize { dest, limit } => {
                if !verify_size(limit) {
                    return Err(EngineError::InvalidSize { limit });
                }
                self.dests.get_mut(dest)?.max_size = limit;
            }
            Command::SetDestMaxAge { dest, limit } => {
                if !verify_age(limit) {
                    return Err(EngineError::InvalidAge { limit });
                }
                self.dests.get_mut(dest)?.max_age = limit;
            }
            Command::SetDestCount { dest, count } => {
                if !verify_count(count) {
                    return Err(EngineError::InvalidCount { count });
                }
                self.rotation.set_sequence_count(&mut self.dests, dest, count)?;
                self.persist_state();
            }
            Command::SetDestState { dest, state } => {
                self.rotation.set_state(&mut self.dests, dest, state)?;
                self.persist_state();
            }
            Command::CloseFile { dest } => {
                self.rotation.close(dest)?;
            }
            Command::CloseAll => {
                self.rotation.close_all();
            }
            Command::SetEngineState(state) => {
                self.state = state;
                self.persist_state();
            }
            Command::ResetCounters => {
                self.counters.reset();
                self.rotation.reset_metrics();
            }
        }
        Ok(())
    }

    /// Push the mutable state subset to the recovery store
    fn persist_state(&mut self) {
        let snapshot = Snapshot {
            engine_enabled: self.state.is_enabled(),
            records: self
                .dests
                .iter()
                .map(|(_, entry)| DestRecord {
                    enabled: entry.enable_state.is_enabled(),
                    sequence_count: entry.sequence_count,
                })
                .collect(),
        };

        if let Err(e) = self.recovery.persist(&snapshot) {
            tracing::warn!(error = %e, "snapshot persist failed");
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("mids", &self.filter.registered())
            .field("destinations", &self.dests.len())
            .finish()
    }
}

/// Build the destination table from configuration
fn build_dest_table(config: &Config) -> DestFileTable {
    let mut table = DestFileTable::with_capacity(config.destinations.len());
    for (index, spec) in config.destinations.iter().enumerate() {
        if let Ok(entry) = table.get_mut(index) {
            *entry = DestFileEntry {
                pathname: spec.path.clone(),
                basename: spec.base.clone(),
                extension: spec.extension.clone(),
                name_kind: name_kind(spec.naming),
                max_size: spec.max_size,
                max_age: spec.max_age,
                sequence_count: spec.sequence_count,
                enable_state: enable_state(spec.enabled),
            };
        }
    }
    table
}

fn enable_state(enabled: bool) -> EnableState {
    if enabled {
        EnableState::Enabled
    } else {
        EnableState::Disabled
    }
}

fn name_kind(naming: NamingConfig) -> NameKind {
    match naming {
        NamingConfig::Count => NameKind::Count,
        NamingConfig::Time => NameKind::Time,
    }
}

fn filter_kind(kind: FilterKindConfig) -> FilterKind {
    match kind {
        FilterKindConfig::Count => FilterKind::ByCount,
        FilterKindConfig::Time => FilterKind::ByTime,
    }
}
