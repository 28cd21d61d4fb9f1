//! Message-bus seam
//!
//! The engine tells its input side which MIDs it wants, exactly when a MID
//! is registered or removed. Subscription failures are reported but never
//! block the table mutation - the filter entry is authoritative.

use packrat_protocol::MessageId;
use thiserror::Error;

/// Error from the bus collaborator
#[derive(Debug, Error)]
#[error("bus {operation} for {mid} failed: {message}")]
pub struct BusError {
    /// "subscribe" or "unsubscribe"
    pub operation: &'static str,
    /// Affected MID
    pub mid: MessageId,
    /// Collaborator-specific detail
    pub message: String,
}

/// Subscription interface to the packet source
pub trait BusClient: Send {
    /// Request delivery of a MID's packets
    ///
    /// # Errors
    ///
    /// Collaborator-specific failures; the engine logs and continues.
    fn subscribe(&mut self, mid: MessageId) -> Result<(), BusError>;

    /// Stop delivery of a MID's packets
    ///
    /// # Errors
    ///
    /// Collaborator-specific failures; the engine logs and continues.
    fn unsubscribe(&mut self, mid: MessageId) -> Result<(), BusError>;
}

/// Bus client that accepts everything and does nothing
///
/// Used when the packet source delivers all traffic anyway (the UDP
/// source) and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBus;

impl BusClient for NullBus {
    fn subscribe(&mut self, _mid: MessageId) -> Result<(), BusError> {
        Ok(())
    }

    fn unsubscribe(&mut self, _mid: MessageId) -> Result<(), BusError> {
        Ok(())
    }
}
