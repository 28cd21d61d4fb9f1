//! Engine run loop
//!
//! One task owns the engine and consumes one queue. Packets and commands
//! interleave in arrival order; a periodic interval drives the age and
//! growth-rate tick. Dropping every sender shuts the loop down cleanly:
//! open files are finalized and a last snapshot is pushed.

use std::time::Duration;

use packrat_protocol::Packet;
use packrat_storage::FileInfo;
use tokio::sync::{mpsc, oneshot};

use crate::command::Command;
use crate::counters::PacketCounters;
use crate::engine::Engine;

/// Everything the engine task consumes
#[derive(Debug)]
pub enum Event {
    /// A packet arrived from the source
    Packet(Packet),

    /// An operator command
    Command(Command),

    /// Request the per-destination status rows
    FileInfo(oneshot::Sender<Vec<FileInfo>>),

    /// Request the engine counters
    Counters(oneshot::Sender<PacketCounters>),
}

/// Run the engine until every event sender is dropped
///
/// Consumes the engine and returns it after shutdown, so tests can inspect
/// final state.
pub async fn run(
    mut engine: Engine,
    mut receiver: mpsc::Receiver<Event>,
    tick_interval: Duration,
) -> Engine {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first interval tick fires immediately; skip it so file ages
    // start at zero
    ticker.tick().await;

    let elapsed_secs = tick_interval.as_secs().max(1) as u32;
    tracing::info!(tick_secs = elapsed_secs, "engine loop starting");

    loop {
        tokio::select! {
            event = receiver.recv() => {
                match event {
                    Some(Event::Packet(packet)) => engine.handle_packet(&packet),
                    Some(Event::Command(command)) => {
                        // Rejections are counted and logged by the engine
                        let _ = engine.handle_command(command);
                    }
                    Some(Event::FileInfo(reply)) => {
                        let _ = reply.send(engine.file_info());
                    }
                    Some(Event::Counters(reply)) => {
                        let _ = reply.send(engine.counters());
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                engine.tick(elapsed_secs);
            }
        }
    }

    engine.shutdown();

    let counters = engine.counters();
    tracing::info!(
        passed = counters.passed,
        filtered = counters.filtered,
        ignored = counters.ignored,
        disabled = counters.disabled,
        "engine loop stopped"
    );

    engine
}
