//! Vocabulary snapshot caches.
//!
//! Snapshots are keyed by the allow-list fingerprint, so a configuration
//! change never serves a stale type set.
//!
//! | Cache | Scope | Lifetime |
//! |-------|-------|----------|
//! | [`NoCache`] | none | never stores |
//! | [`MemoryCache`] | process | until invalidated |
//! | [`FileCache`] | disk | until invalidated or the layout version changes |
//!
//! `FileCache` writes `vocabulary-<fingerprint>.json` through a temporary
//! file and a rename, so readers never observe a half-written snapshot. A
//! file that fails to parse, carries another version or fingerprint, or
//! breaks the snapshot invariants is removed and reported as a miss.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{SNAPSHOT_VERSION, VocabularySnapshot};
use crate::error::{Result, SchemaError};
use crate::log;

/// Storage for built vocabulary snapshots.
pub trait SnapshotCache: Send + Sync {
    /// Look up the snapshot built for `fingerprint`. Misses are `None`.
    fn load(&self, fingerprint: &str) -> Option<VocabularySnapshot>;

    fn store(&self, snapshot: &VocabularySnapshot) -> Result<()>;

    /// Drop the snapshot for `fingerprint`, if any.
    fn invalidate(&self, fingerprint: &str) -> Result<()>;
}

// ============================================================================
// No Cache
// ============================================================================

/// Cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl SnapshotCache for NoCache {
    fn load(&self, _fingerprint: &str) -> Option<VocabularySnapshot> {
        None
    }

    fn store(&self, _snapshot: &VocabularySnapshot) -> Result<()> {
        Ok(())
    }

    fn invalidate(&self, _fingerprint: &str) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Memory Cache
// ============================================================================

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, VocabularySnapshot>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SnapshotCache for MemoryCache {
    fn load(&self, fingerprint: &str) -> Option<VocabularySnapshot> {
        self.entries.read().get(fingerprint).cloned()
    }

    fn store(&self, snapshot: &VocabularySnapshot) -> Result<()> {
        self.entries
            .write()
            .insert(snapshot.fingerprint.clone(), snapshot.clone());
        Ok(())
    }

    fn invalidate(&self, fingerprint: &str) -> Result<()> {
        self.entries.write().remove(fingerprint);
        Ok(())
    }
}

// ============================================================================
// File Cache
// ============================================================================

/// Distinguishes temporary files written concurrently by one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

const FILE_PREFIX: &str = "vocabulary-";
const FILE_SUFFIX: &str = ".json";

/// Cache of JSON snapshot files in one directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for `fingerprint`.
    pub fn path_for(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{fingerprint}{FILE_SUFFIX}"))
    }

    /// Remove every snapshot file in the directory. Returns the count removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(self.error(&self.dir, source)),
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                let path = entry.path();
                fs::remove_file(&path).map_err(|source| self.error(&path, source))?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn error(&self, path: &Path, source: io::Error) -> SchemaError {
        SchemaError::Cache {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Delete a snapshot file that cannot be served.
    fn discard(&self, path: &Path, reason: &str) {
        log!("cache"; "discarding {}: {reason}", path.display());
        if let Err(err) = fs::remove_file(path)
            && err.kind() != io::ErrorKind::NotFound
        {
            log!("cache"; "could not remove {}: {err}", path.display());
        }
    }
}

impl SnapshotCache for FileCache {
    fn load(&self, fingerprint: &str) -> Option<VocabularySnapshot> {
        let path = self.path_for(fingerprint);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log!("cache"; "cannot read {}: {err}", path.display());
                return None;
            }
        };

        let snapshot: VocabularySnapshot = match serde_json::from_str(&content) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.discard(&path, &format!("unreadable snapshot ({err})"));
                return None;
            }
        };

        if snapshot.version != SNAPSHOT_VERSION || snapshot.fingerprint != fingerprint {
            self.discard(&path, "stale snapshot");
            return None;
        }
        if let Err(err) = snapshot.check() {
            self.discard(&path, &err.to_string());
            return None;
        }
        Some(snapshot)
    }

    fn store(&self, snapshot: &VocabularySnapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| self.error(&self.dir, source))?;

        let path = self.path_for(&snapshot.fingerprint);
        let temp = self.dir.join(format!(
            ".{FILE_PREFIX}{}.{}.{}.tmp",
            snapshot.fingerprint,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let content = serde_json::to_vec(snapshot)?;
        if let Err(source) = fs::write(&temp, content) {
            fs::remove_file(&temp).ok();
            return Err(self.error(&temp, source));
        }
        if let Err(source) = fs::rename(&temp, &path) {
            fs::remove_file(&temp).ok();
            return Err(self.error(&path, source));
        }
        Ok(())
    }

    fn invalidate(&self, fingerprint: &str) -> Result<()> {
        let path = self.path_for(fingerprint);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.error(&path, source)),
        }
    }
}
