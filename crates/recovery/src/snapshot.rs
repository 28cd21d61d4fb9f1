//! Snapshot codec
//!
//! Layout, big-endian:
//!
//! ```text
//! offset 0  u32  magic "PKRS"
//! offset 4  u16  schema version
//! offset 6  u16  record count
//! offset 8  u8   engine enabled (0/1)
//! offset 9  records: { u8 enabled, u32 sequence_count } x count
//! ```
//!
//! Records are indexed by destination file index.

use bytes::{BufMut, BytesMut};

use crate::error::{RecoveryError, Result};

/// Snapshot magic: "PKRS"
pub const SNAPSHOT_MAGIC: u32 = 0x504B_5253;

/// Snapshot schema version
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 9;
const RECORD_LEN: usize = 5;

/// Persisted state for one destination file index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestRecord {
    /// Destination enable state
    pub enabled: bool,
    /// Next filename sequence count
    pub sequence_count: u32,
}

/// The full persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Engine-level enable state
    pub engine_enabled: bool,
    /// One record per destination file index
    pub records: Vec<DestRecord>,
}

impl Snapshot {
    /// Encode to the fixed wire layout
    #[must_use]
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.records.len() * RECORD_LEN);
        buf.put_u32(SNAPSHOT_MAGIC);
        buf.put_u16(SNAPSHOT_VERSION);
        buf.put_u16(self.records.len() as u16);
        buf.put_u8(u8::from(self.engine_enabled));
        for record in &self.records {
            buf.put_u8(u8::from(record.enabled));
            buf.put_u32(record.sequence_count);
        }
        buf
    }

    /// Decode from the fixed wire layout
    ///
    /// # Errors
    ///
    /// Returns a schema error for any magic/version/length/state-byte
    /// mismatch. Callers treat every decode error as "no snapshot".
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(RecoveryError::Truncated {
                actual: buf.len(),
                expected: HEADER_LEN,
            });
        }

        let magic = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != SNAPSHOT_MAGIC {
            return Err(RecoveryError::BadMagic { found: magic });
        }

        let version = u16::from_be_bytes([buf[4], buf[5]]);
        if version != SNAPSHOT_VERSION {
            return Err(RecoveryError::UnsupportedVersion {
                found: version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let count = u16::from_be_bytes([buf[6], buf[7]]) as usize;
        let expected = HEADER_LEN + count * RECORD_LEN;
        if buf.len() < expected {
            return Err(RecoveryError::Truncated {
                actual: buf.len(),
                expected,
            });
        }

        let engine_enabled = decode_state(buf[8], 0)?;
        let mut records = Vec::with_capacity(count);
        for index in 0..count {
            let base = HEADER_LEN + index * RECORD_LEN;
            let enabled = decode_state(buf[base], index)?;
            let sequence_count =
                u32::from_be_bytes([buf[base + 1], buf[base + 2], buf[base + 3], buf[base + 4]]);
            records.push(DestRecord {
                enabled,
                sequence_count,
            });
        }

        Ok(Self {
            engine_enabled,
            records,
        })
    }
}

fn decode_state(value: u8, index: usize) -> Result<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(RecoveryError::InvalidState { index, value }),
    }
}
