//! packrat - Engine
//!
//! The engine facade orchestrates a packet's whole path: MID index lookup,
//! per-slot admission filtering, destination file rotation, and recovery
//! snapshot pushes. One engine instance owns every table; the async run
//! loop feeds it packets and commands from a single queue, so there is at
//! most one in-flight operation at a time and no table needs a lock.
//!
//! # Example
//!
//! ```no_run
//! use packrat_config::Config;
//! use packrat_engine::{Engine, NullBus};
//! use packrat_recovery::NullStore;
//! use packrat_storage::StdFileIo;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("").unwrap();
//! let engine = Engine::new(
//!     &config,
//!     Box::new(StdFileIo),
//!     Box::new(NullStore),
//!     Box::new(NullBus),
//! ).unwrap();
//! ```

mod bus;
mod command;
mod counters;
mod engine;
mod error;
mod runtime;



pub use bus::{BusClient, BusError, NullBus};
pub use command::Command;
pub use counters::PacketCounters;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use runtime::{run, Event};
