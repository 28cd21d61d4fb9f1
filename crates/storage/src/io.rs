//! File-I/O seam for destination files
//!
//! The rotation manager never touches the filesystem directly: it opens
//! files through a [`FileIo`] factory and drives them through the
//! object-safe [`DestWrite`] trait. [`StdFileIo`] is the real
//! implementation; tests substitute recording or failing ones.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use crate::header::{FileHeader, HeaderCounts, COUNTS_OFFSET};

/// An open destination file
///
/// Object-safe so the file status registry can hold `Box<dyn DestWrite>`.
/// The boxed writer is the open handle: dropping or finishing it closes
/// the file, and no copy of it ever exists elsewhere.
pub trait DestWrite: Send {
    /// Append packet bytes after the header
    fn append(&mut self, data: &[u8]) -> io::Result<()>;

    /// Rewrite the header's counts region in place
    fn update_header(&mut self, counts: &HeaderCounts) -> io::Result<()>;

    /// Flush and close the file
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// Factory for open destination files
pub trait FileIo: Send {
    /// Create the file at `path`, write the recorder header, return the
    /// open handle
    ///
    /// # Errors
    ///
    /// Any I/O failure aborts the open; no handle is returned and the
    /// caller's state machine stays Closed.
    fn open(&self, path: &Path, header: &FileHeader) -> io::Result<Box<dyn DestWrite>>;
}

/// Real-filesystem implementation of [`FileIo`]
///
/// Creates missing parent directories, truncates any stale file of the
/// same name, and writes the header before handing out the writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileIo;

impl FileIo for StdFileIo {
    fn open(&self, path: &Path, header: &FileHeader) -> io::Result<Box<dyn DestWrite>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(&header.encode())?;

        Ok(Box::new(StdDestFile { file }))
    }
}

struct StdDestFile {
    file: File,
}

impl DestWrite for StdDestFile {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    fn update_header(&mut self, counts: &HeaderCounts) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(COUNTS_OFFSET as u64))?;
        self.file.write_all(&counts.encode())?;
        self.file.seek(SeekFrom::End(0))?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// True if a write error means the open handle itself is gone
///
/// Such errors force a close without a header update; anything else is
/// treated as transient and the file stays open for best-effort
/// continuation.
#[must_use]
pub fn is_handle_lost(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{decode_header, HEADER_LEN};
    use tempfile::TempDir;

    fn header() -> FileHeader {
        FileHeader {
            dest_index: 2,
            sequence_count: 11,
            opened_secs: 1_000,
        }
    }

    #[test]
    fn test_open_creates_parents_and_writes_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/nested/tlm00000011.pkt");

        let writer = StdFileIo.open(&path, &header()).unwrap();
        writer.finish().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);
        let (decoded, counts) = decode_header(&bytes).unwrap();
        assert_eq!(decoded, header());
        assert_eq!(counts, HeaderCounts::default());
    }

    #[test]
    fn test_append_lands_after_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.pkt");

        let mut writer = StdFileIo.open(&path, &header()).unwrap();
        writer.append(b"abcdef").unwrap();
        writer.finish().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[HEADER_LEN..], b"abcdef");
    }

    #[test]
    fn test_update_header_rewrites_counts_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.pkt");

        let mut writer = StdFileIo.open(&path, &header()).unwrap();
        writer.append(b"0123456789").unwrap();
        writer
            .update_header(&HeaderCounts {
                records: 1,
                bytes: 10,
                closed_secs: 2_000,
            })
            .unwrap();
        // Appends after an update must still land at the end
        writer.append(b"tail").unwrap();
        writer.finish().unwrap();

        let bytes = fs::read(&path).unwrap();
        let (decoded, counts) = decode_header(&bytes).unwrap();
        assert_eq!(decoded, header());
        assert_eq!(counts.records, 1);
        assert_eq!(counts.bytes, 10);
        assert_eq!(&bytes[bytes.len() - 4..], b"tail");
    }

    #[test]
    fn test_handle_lost_classification() {
        assert!(is_handle_lost(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(is_handle_lost(&io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(!is_handle_lost(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_handle_lost(&io::Error::from(io::ErrorKind::WriteZero)));
    }
}
