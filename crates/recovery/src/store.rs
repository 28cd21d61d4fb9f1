//! Persistent snapshot store
//!
//! The [`RecoveryStore`] trait is the engine's seam to persistence.
//! [`FileStore`] writes the snapshot through a temp file and rename, so a
//! power cut mid-write leaves the previous snapshot intact. [`NullStore`]
//! persists nothing (tests, or recovery disabled by configuration).

use std::fs;
use std::path::PathBuf;

use crate::error::{RecoveryError, Result};
use crate::snapshot::Snapshot;

/// Seam between the engine and snapshot persistence
pub trait RecoveryStore: Send {
    /// Persist a snapshot, replacing any previous one
    ///
    /// # Errors
    ///
    /// I/O failures; the caller logs and continues (the next mutation will
    /// persist again).
    fn persist(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Load the stored snapshot
    ///
    /// Returns `Ok(None)` if no snapshot exists. Schema mismatches and read
    /// failures surface as errors; callers degrade them to `None`.
    ///
    /// # Errors
    ///
    /// I/O failures and schema mismatches.
    fn load(&mut self) -> Result<Option<Snapshot>>;
}

/// File-backed snapshot store with atomic replacement
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the given snapshot path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path
    #[inline]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl RecoveryStore for FileStore {
    fn persist(&mut self, snapshot: &Snapshot) -> Result<()> {
        let path_str = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RecoveryError::io(&path_str, e))?;
            }
        }

        // Write-then-rename: the previous snapshot survives a crash mid-write
        let tmp = self.tmp_path();
        fs::write(&tmp, snapshot.encode()).map_err(|e| RecoveryError::io(&path_str, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| RecoveryError::io(&path_str, e))?;

        tracing::trace!(path = %path_str, records = snapshot.records.len(), "snapshot persisted");
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Snapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RecoveryError::io(self.path.display().to_string(), e)),
        };

        Snapshot::decode(&bytes).map(Some)
    }
}

/// Store that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl RecoveryStore for NullStore {
    fn persist(&mut self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Snapshot>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::DestRecord;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        Snapshot {
            engine_enabled: true,
            records: vec![DestRecord {
                enabled: true,
                sequence_count: 3,
            }],
        }
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("packrat.snap"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_persist_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("packrat.snap"));

        store.persist(&sample()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_persist_replaces_previous() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("packrat.snap"));

        store.persist(&sample()).unwrap();
        let mut updated = sample();
        updated.records[0].sequence_count = 99;
        store.persist(&updated).unwrap();

        assert_eq!(store.load().unwrap().unwrap(), updated);
        // No temp file left behind
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("state/deep/packrat.snap"));
        store.persist(&sample()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packrat.snap");
        fs::write(&path, b"not a snapshot").unwrap();

        let mut store = FileStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_null_store_keeps_nothing() {
        let mut store = NullStore;
        store.persist(&sample()).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
