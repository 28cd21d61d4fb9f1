//! Wire packet frame
//!
//! Frame layout (big-endian):
//!
//! ```text
//! offset 0   u16  message ID
//! offset 2   u16  sequence
//! offset 4   u16  total frame length (header + payload)
//! offset 6   u32  timestamp, whole seconds
//! offset 10  u16  timestamp, subseconds
//! offset 12  ...  payload
//! ```
//!
//! The header is all the engine ever reads: the message ID selects the
//! filter entry and the timestamp seconds feed time-based filters.

use bytes::Bytes;

use crate::error::{ProtocolError, Result};
use crate::mid::MessageId;

/// Fixed frame header length in bytes
pub const HEADER_LEN: usize = 12;

/// Maximum accepted frame length
pub const MAX_PACKET_LEN: usize = 64 * 1024;

/// A validated wire packet
///
/// Owns the full frame as `Bytes`, so cloning is cheap and writing the
/// packet to a destination file is a single contiguous append.
#[derive(Debug, Clone)]
pub struct Packet {
    frame: Bytes,
}

impl Packet {
    /// Parse and validate a received frame
    ///
    /// # Errors
    ///
    /// Returns `TooShort` if the frame cannot hold the header, `TooLong` if
    /// it exceeds [`MAX_PACKET_LEN`], and `LengthMismatch` if the declared
    /// length disagrees with the received byte count.
    pub fn parse(frame: Bytes) -> Result<Self> {
        if frame.len() < HEADER_LEN {
            return Err(ProtocolError::TooShort {
                actual: frame.len(),
                expected: HEADER_LEN,
            });
        }
        if frame.len() > MAX_PACKET_LEN {
            return Err(ProtocolError::TooLong {
                actual: frame.len(),
                limit: MAX_PACKET_LEN,
            });
        }

        let declared = u16::from_be_bytes([frame[4], frame[5]]) as usize;
        if declared != frame.len() {
            return Err(ProtocolError::LengthMismatch {
                declared,
                actual: frame.len(),
            });
        }

        Ok(Self { frame })
    }

    /// Compose a frame from parts (sources and tests)
    #[must_use]
    pub fn compose(mid: MessageId, sequence: u16, timestamp_secs: u32, payload: &[u8]) -> Vec<u8> {
        let total = HEADER_LEN + payload.len();
        let mut frame = Vec::with_capacity(total);
        frame.extend_from_slice(&mid.value().to_be_bytes());
        frame.extend_from_slice(&sequence.to_be_bytes());
        frame.extend_from_slice(&(total as u16).to_be_bytes());
        frame.extend_from_slice(&timestamp_secs.to_be_bytes());
        frame.extend_from_slice(&0u16.to_be_bytes());
        frame.extend_from_slice(payload);
        frame
    }

    /// Message ID from the header
    #[inline]
    #[must_use]
    pub fn mid(&self) -> MessageId {
        MessageId::new(u16::from_be_bytes([self.frame[0], self.frame[1]]))
    }

    /// Sequence field from the header
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> u16 {
        u16::from_be_bytes([self.frame[2], self.frame[3]])
    }

    /// Embedded timestamp, whole seconds
    ///
    /// This is the counter source for time-based filters.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.frame[6], self.frame[7], self.frame[8], self.frame[9]])
    }

    /// Total frame length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    /// True if the frame carries no payload
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.len() == HEADER_LEN
    }

    /// Payload bytes (after the header)
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.frame[HEADER_LEN..]
    }

    /// The full frame, header included
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.frame
    }
}
