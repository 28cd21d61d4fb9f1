//! Recorder file header
//!
//! Every destination file starts with a fixed 36-byte header, big-endian:
//!
//! ```text
//! offset 0   u32  magic
//! offset 4   u16  schema version
//! offset 6   u16  destination file index
//! offset 8   u32  filename sequence count
//! offset 12  u64  open timestamp, unix seconds
//! offset 20  u32  record count        \
//! offset 24  u32  data bytes           } rewritten in place at close
//! offset 28  u64  close timestamp     /
//! ```
//!
//! The trailing counts are zero while the file is open and only correct
//! once finalized, so closing always updates the header first.

use bytes::{BufMut, BytesMut};

/// Total header length in bytes
pub const HEADER_LEN: usize = 36;

/// Byte offset of the close-time counts within the header
pub const COUNTS_OFFSET: usize = 20;

/// Header magic: "PKRF"
pub const HEADER_MAGIC: u32 = 0x504B_5246;

/// Header schema version
pub const HEADER_VERSION: u16 = 1;

/// The fields written when a destination file is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Destination file table index
    pub dest_index: u16,
    /// Filename sequence count the file was opened under
    pub sequence_count: u32,
    /// Unix seconds at open
    pub opened_secs: u64,
}

/// The fields rewritten at rotation or close
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderCounts {
    /// Packets written to the file
    pub records: u32,
    /// Payload bytes written after the header
    pub bytes: u32,
    /// Unix seconds at close
    pub closed_secs: u64,
}

impl FileHeader {
    /// Encode the full header with zeroed counts
    #[must_use]
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        buf.put_u32(HEADER_MAGIC);
        buf.put_u16(HEADER_VERSION);
        buf.put_u16(self.dest_index);
        buf.put_u32(self.sequence_count);
        buf.put_u64(self.opened_secs);
        buf.put_u32(0); // records
        buf.put_u32(0); // bytes
        buf.put_u64(0); // closed
        buf
    }
}

impl HeaderCounts {
    /// Encode just the counts region
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN - COUNTS_OFFSET] {
        let mut buf = [0u8; HEADER_LEN - COUNTS_OFFSET];
        buf[0..4].copy_from_slice(&self.records.to_be_bytes());
        buf[4..8].copy_from_slice(&self.bytes.to_be_bytes());
        buf[8..16].copy_from_slice(&self.closed_secs.to_be_bytes());
        buf
    }
}

/// Decode a header from the start of a file (readers and tests)
///
/// A short prefix, wrong magic, or unknown version is simply not a
/// recorder header: decode returns `None` rather than an error.
#[must_use]
pub fn decode_header(buf: &[u8]) -> Option<(FileHeader, HeaderCounts)> {
    if buf.len() < HEADER_LEN {
        return None;
    }
    let magic = u32::from_be_bytes(buf[0..4].try_into().ok()?);
    let version = u16::from_be_bytes(buf[4..6].try_into().ok()?);
    if magic != HEADER_MAGIC || version != HEADER_VERSION {
        return None;
    }

    let header = FileHeader {
        dest_index: u16::from_be_bytes(buf[6..8].try_into().ok()?),
        sequence_count: u32::from_be_bytes(buf[8..12].try_into().ok()?),
        opened_secs: u64::from_be_bytes(buf[12..20].try_into().ok()?),
    };
    let counts = HeaderCounts {
        records: u32::from_be_bytes(buf[20..24].try_into().ok()?),
        bytes: u32::from_be_bytes(buf[24..28].try_into().ok()?),
        closed_secs: u64::from_be_bytes(buf[28..36].try_into().ok()?),
    };
    Some((header, counts))
}

/// Unix seconds now, for header timestamps
#[must_use]
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_len() {
        let header = FileHeader {
            dest_index: 3,
            sequence_count: 17,
            opened_secs: 1_700_000_000,
        };
        assert_eq!(header.encode().len(), HEADER_LEN);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let header = FileHeader {
            dest_index: 5,
            sequence_count: 99,
            opened_secs: 123_456,
        };
        let mut buf = header.encode();

        let counts = HeaderCounts {
            records: 10,
            bytes: 420,
            closed_secs: 123_999,
        };
        buf[COUNTS_OFFSET..].copy_from_slice(&counts.encode());

        let (decoded_header, decoded_counts) = decode_header(&buf).unwrap();
        assert_eq!(decoded_header, header);
        assert_eq!(decoded_counts, counts);
    }

    #[test]
    fn test_decode_rejects_foreign_prefix() {
        assert!(decode_header(&[0u8; HEADER_LEN]).is_none());
        assert!(decode_header(&[0u8; 4]).is_none());
    }

    #[test]
    fn test_fresh_header_has_zero_counts() {
        let header = FileHeader {
            dest_index: 0,
            sequence_count: 0,
            opened_secs: 1,
        };
        let (_, counts) = decode_header(&header.encode()).unwrap();
        assert_eq!(counts, HeaderCounts::default());
    }
}
