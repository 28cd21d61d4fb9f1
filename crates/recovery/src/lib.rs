//! packrat - Recovery store
//!
//! A minimal persistent snapshot that survives restarts: the engine enable
//! state plus, per destination file index, the enable state and the next
//! filename sequence count. Restoring it before the first packet prevents
//! filename collisions and keeps operator enable/disable decisions across a
//! power cycle.
//!
//! The snapshot is deliberately schema-stable and tiny. Any mismatch on
//! load (magic, version, record count, truncation) is treated as "no
//! snapshot available" by callers, never as a fatal error - the engine
//! falls back to table-defined defaults.

mod error;
mod snapshot;
mod store;

pub use error::{RecoveryError, Result};
pub use snapshot::{DestRecord, Snapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use store::{FileStore, NullStore, RecoveryStore};
