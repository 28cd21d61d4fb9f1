//! Recorder server
//!
//! Wires the pieces together: engine task on one queue, UDP packet source
//! feeding it, ctrl-c for a clean shutdown (files finalized, snapshot
//! pushed).

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use packrat_config::Config;
use packrat_engine::{run as run_engine, Engine, Event, NullBus};
use packrat_protocol::{Packet, MAX_PACKET_LEN};
use packrat_recovery::{FileStore, NullStore, RecoveryStore};
use packrat_storage::StdFileIo;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Run the recorder until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let recovery: Box<dyn RecoveryStore> = if config.recovery.enabled {
        Box::new(FileStore::new(&config.recovery.path))
    } else {
        tracing::info!("recovery store disabled by configuration");
        Box::new(NullStore)
    };

    let engine = Engine::new(&config, Box::new(StdFileIo), recovery, Box::new(NullBus))
        .context("engine activation failed")?;

    let tick = Duration::from_secs(config.recorder.tick_interval_secs.max(1));
    let (tx, rx) = mpsc::channel::<Event>(1024);
    let engine_task = tokio::spawn(run_engine(engine, rx, tick));

    let bind = (config.source.bind.as_str(), config.source.udp_port);
    let socket = UdpSocket::bind(bind)
        .await
        .with_context(|| format!("binding UDP source {}:{}", config.source.bind, config.source.udp_port))?;
    tracing::info!(
        addr = %socket.local_addr().map(|a| a.to_string()).unwrap_or_default(),
        "UDP packet source listening"
    );

    let source_tx = tx.clone();
    let source_task = tokio::spawn(async move {
        let mut buf = vec![0u8; MAX_PACKET_LEN];
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, peer)) => match Packet::parse(Bytes::copy_from_slice(&buf[..len])) {
                    Ok(packet) => {
                        if source_tx.send(Event::Packet(packet)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(%peer, error = %e, "malformed frame dropped");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "socket receive failed");
                }
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutdown signal received");

    // Stop the source first, then drain the engine queue by dropping the
    // last sender
    source_task.abort();
    drop(tx);

    let engine = engine_task.await.context("engine task panicked")?;
    let counters = engine.counters();
    let storage = engine.storage_metrics();
    tracing::info!(
        passed = counters.passed,
        filtered = counters.filtered,
        writes = storage.file_writes,
        write_errors = storage.write_errors,
        "recorder stopped"
    );

    Ok(())
}
