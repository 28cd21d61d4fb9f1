//! packrat - Destination file storage
//!
//! Everything between an admission decision and bytes on disk: the
//! destination file table (configuration), the file status registry
//! (runtime state), the recorder file header, the file-I/O seam, and the
//! rotation manager that opens, rotates and closes destination files.
//!
//! # Design
//!
//! Each destination index is an independent Closed/Open state machine. A
//! file opens on the first admitted packet, rotates when a write would push
//! it past its size limit, closes when it outlives its age limit, and is
//! always finalized header-first so the header's record and byte counts are
//! trustworthy after close.
//!
//! File I/O goes through the [`FileIo`] / [`DestWrite`] traits so tests can
//! substitute recording or failing implementations; [`StdFileIo`] is the
//! real-filesystem implementation.

mod dest;
mod error;
mod header;
mod io;
mod rotation;
mod status;


pub use dest::{
    compose_filename, verify_age, verify_count, verify_index, verify_size, DestFileEntry,
    DestFileTable, EnableState, NameKind, DEST_FILE_COUNT, MAX_SEQUENCE_COUNT, MIN_AGE_LIMIT,
    MIN_SIZE_LIMIT,
};
pub use error::{Result, StorageError};
pub use header::{
    decode_header, unix_now, FileHeader, HeaderCounts, COUNTS_OFFSET, HEADER_LEN, HEADER_MAGIC,
    HEADER_VERSION,
};
pub use io::{is_handle_lost, DestWrite, FileIo, StdFileIo};
pub use rotation::{CloseOutcome, RotationManager, StorageMetrics, WriteOutcome};
pub use status::{FileInfo, FileStatus, OpenState};
