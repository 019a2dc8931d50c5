//! Path-keyed cache of parsed storage documents.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use normalize_path::NormalizePath;

use crate::StorageError;
use crate::persist::{Document, WriteOutcome, read_document, write_document};

/// Cache of parsed documents keyed by absolute path.
///
/// A document is read and parsed once, on the first [`load`](Self::load) of its path;
/// later loads return the same in-memory instance, including any edits made through
/// it. Edits reach disk only through [`save_all`](Self::save_all).
///
/// # Memory growth
///
/// Entries are never dropped on their own. Every distinct path loaded stays resident
/// until [`evict`](Self::evict) is called or the cache itself is dropped, so a
/// long-running session that touches many files grows without bound.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<PathBuf, Document>,
}

/// What [`DocumentCache::save_all`] did.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub written: usize,
    /// Cached paths whose files no longer exist
    pub skipped: Vec<PathBuf>,
    /// Cached paths whose write failed, with the error
    pub failed: Vec<(PathBuf, StorageError)>,
}

impl SaveReport {
    /// True when no write failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document for `path`, reading it on first use.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the path is not cached and has no file; read and
    /// parse failures otherwise. Failed loads insert nothing.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Document, StorageError> {
        let key = cache_key(path.as_ref())?;

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!("Document cache hit for {}", entry.key().display());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let document = read_document(entry.key())?
                    .ok_or_else(|| StorageError::NotFound(entry.key().clone()))?;
                Ok(entry.insert(document))
            }
        }
    }

    /// Cached document for `path`, without touching the disk.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Document> {
        let key = cache_key(path.as_ref()).ok()?;
        self.entries.get(&key)
    }

    pub fn get_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut Document> {
        let key = cache_key(path.as_ref()).ok()?;
        self.entries.get_mut(&key)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_some()
    }

    /// Drop the cached entry for `path` without saving it.
    ///
    /// Returns the removed document, or `None` if the path was not cached.
    pub fn evict(&mut self, path: impl AsRef<Path>) -> Option<Document> {
        let key = cache_key(path.as_ref()).ok()?;
        self.entries.remove(&key)
    }

    /// Write every cached document back to the file it was loaded from.
    ///
    /// Every entry is attempted. Files that have disappeared are skipped, and failed
    /// writes are logged; both are listed in the report.
    pub fn save_all(&self) -> SaveReport {
        self.save_with(write_document)
    }

    fn save_with(
        &self,
        mut write: impl FnMut(&Path, &Document) -> Result<WriteOutcome, StorageError>,
    ) -> SaveReport {
        let mut report = SaveReport::default();

        for (path, document) in &self.entries {
            match write(path, document) {
                Ok(WriteOutcome::Written) => report.written += 1,
                Ok(WriteOutcome::Skipped) => report.skipped.push(path.clone()),
                Err(err) => {
                    error!("Failed to save document {}: {}", path.display(), err);
                    report.failed.push((path.clone(), err));
                }
            }
        }

        report
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths of all cached documents, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

/// Absolute, lexically normalized form of `path` used as the cache key.
pub fn cache_key(path: &Path) -> Result<PathBuf, StorageError> {
    std::path::absolute(path)
        .map(|absolute| absolute.normalize())
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// A [`DocumentCache`] shared as a Bevy resource.
///
/// One mutex guards the whole cache: a load is a read-modify-write of the entry map.
#[derive(Resource, Clone, Default, Debug)]
pub struct SharedDocumentCache(pub Arc<Mutex<DocumentCache>>);

impl SharedDocumentCache {
    /// Lock the cache for exclusive use.
    ///
    /// A poisoned lock is recovered: the entry map is never left half-updated.
    pub fn lock(&self) -> MutexGuard<'_, DocumentCache> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn fixture(name: &str, text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn test_second_load_returns_cached_instance() {
        let (_dir, path) = fixture("player.json", r#"{"lives": 3}"#);
        let mut cache = DocumentCache::new();

        let first: *const Document = cache.load(&path).unwrap();
        fs::write(&path, r#"{"lives": 99}"#).unwrap();
        let second: *const Document = cache.load(&path).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(cache.get(&path), Some(&json!({"lives": 3})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_equivalent_paths_share_an_entry() {
        let (dir, path) = fixture("a.json", "{}");
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut cache = DocumentCache::new();

        cache.load(&path).unwrap();
        cache.load(dir.path().join("sub/../a.json")).unwrap();
        cache.load(dir.path().join("./a.json")).unwrap();

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DocumentCache::new();

        let err = cache.load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evict_reports_presence() {
        let (_dir, path) = fixture("a.json", "[1, 2]");
        let mut cache = DocumentCache::new();
        cache.load(&path).unwrap();

        assert_eq!(cache.evict(&path), Some(json!([1, 2])));
        assert_eq!(cache.evict(&path), None);
        assert!(!cache.contains(&path));
    }

    #[test]
    fn test_save_all_writes_edits() {
        let (_dir, path) = fixture("options.json", r#"{"music": true}"#);
        let mut cache = DocumentCache::new();

        *cache.load(&path).unwrap() = json!({"music": false});
        let report = cache.save_all();

        assert_eq!(report.written, 1);
        assert!(report.skipped.is_empty());
        assert!(report.is_complete());
        let on_disk: Document = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"music": false}));
    }

    #[test]
    fn test_save_all_skips_removed_files() {
        let (_dir, path) = fixture("temp.json", "{}");
        let mut cache = DocumentCache::new();
        cache.load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let report = cache.save_all();

        assert_eq!(report.written, 0);
        assert_eq!(report.skipped, vec![cache_key(&path).unwrap()]);
        assert!(!path.exists());
    }

    #[test]
    fn test_shared_cache_is_one_instance() {
        let (_dir, path) = fixture("a.json", "{}");
        let shared = SharedDocumentCache::default();
        let clone = shared.clone();

        shared.lock().load(&path).unwrap();

        assert!(clone.lock().contains(&path));
    }

    #[test]
    fn test_save_all_continues_after_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.json", "b.json", "c.json"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "{}").unwrap();
                path
            })
            .collect();
        let mut cache = DocumentCache::new();
        for path in &paths {
            *cache.load(path).unwrap() = json!({"saved": true});
        }
        let failing = cache_key(&paths[1]).unwrap();

        let report = cache.save_with(|path, document| {
            if path == failing.as_path() {
                Err(StorageError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("disk full"),
                })
            } else {
                write_document(path, document)
            }
        });

        assert_eq!(report.written, 2);
        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, failing);
        for path in [&paths[0], &paths[2]] {
            let on_disk: Document =
                serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(on_disk, json!({"saved": true}));
        }
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "{}");
    }
}
