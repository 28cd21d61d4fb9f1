//! packrat - Protocol
//!
//! Wire packet types shared by the recorder engine and its sources.
//!
//! A packet is a length-prefixed binary frame with a fixed 12-byte header
//! (message ID, sequence, length, timestamp) followed by an opaque payload.
//! The engine never interprets the payload - only the header fields feed the
//! admission filters.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use packrat_protocol::{MessageId, Packet};
//!
//! let frame = Packet::compose(MessageId::new(0x08A1), 7, 1234, b"payload");
//! let packet = Packet::parse(Bytes::from(frame)).unwrap();
//! assert_eq!(packet.mid(), MessageId::new(0x08A1));
//! assert_eq!(packet.timestamp_secs(), 1234);
//! ```

mod error;
mod mid;
mod packet;

#[cfg(test)]
#[path = "packet_test.rs"]
mod packet_test;

pub use error::{ProtocolError, Result};
pub use mid::MessageId;
pub use packet::{Packet, HEADER_LEN, MAX_PACKET_LEN};
