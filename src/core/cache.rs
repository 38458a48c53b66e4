//! Stage cache implementation.
//!
//! Keeps loaded stages alive and shareable between callers, so the same
//! scene file is only parsed once per process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::scene::Stage;
use crate::util::Result;

/// Key for cache entries.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, PartialOrd, Ord)]
pub struct StageCacheId(u64);

impl StageCacheId {
    /// Raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<StageCacheId, Arc<Stage>>,
    by_source: HashMap<PathBuf, StageCacheId>,
}

/// Thread-safe cache of stages.
///
/// Uses `parking_lot::RwLock` for faster, non-poisoning locks
/// and an `AtomicU64` for lock-free id allocation.
pub struct StageCache {
    entries: RwLock<Entries>,
    next_id: AtomicU64,
}

impl StageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a stage and return its id. A stage with a source path replaces
    /// the source mapping of any earlier stage from the same file.
    pub fn insert(&self, stage: Arc<Stage>) -> StageCacheId {
        let mut entries = self.entries.write();
        self.insert_locked(&mut entries, stage)
    }

    fn insert_locked(&self, entries: &mut Entries, stage: Arc<Stage>) -> StageCacheId {
        let id = StageCacheId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Some(source) = stage.source_path() {
            entries.by_source.insert(source.to_path_buf(), id);
        }
        entries.by_id.insert(id, stage);
        tracing::trace!(id = id.0, "stage cached");
        id
    }

    /// Get a cached stage.
    #[inline]
    pub fn get(&self, id: StageCacheId) -> Option<Arc<Stage>> {
        self.entries.read().by_id.get(&id).cloned()
    }

    /// Find the id of a stage loaded from `source`.
    pub fn find(&self, source: &Path) -> Option<StageCacheId> {
        let source = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());
        self.entries.read().by_source.get(&source).copied()
    }

    /// Return the cached stage for `path`, loading and caching it on a miss.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<(StageCacheId, Arc<Stage>)> {
        let path = path.as_ref();
        if let Some(id) = self.find(path) {
            if let Some(stage) = self.get(id) {
                tracing::debug!(path = %path.display(), "stage cache hit");
                return Ok((id, stage));
            }
        }

        let stage = Arc::new(Stage::open(path)?);

        // Another thread may have loaded the same file while we parsed it
        let mut entries = self.entries.write();
        let raced = stage
            .source_path()
            .and_then(|source| entries.by_source.get(source))
            .and_then(|id| Some((*id, Arc::clone(entries.by_id.get(id)?))));
        if let Some(hit) = raced {
            tracing::debug!(path = %path.display(), "stage loaded concurrently, reusing cached");
            return Ok(hit);
        }
        let id = self.insert_locked(&mut entries, Arc::clone(&stage));
        Ok((id, stage))
    }

    /// Remove a stage. Returns it if it was cached.
    pub fn erase(&self, id: StageCacheId) -> Option<Arc<Stage>> {
        let mut entries = self.entries.write();
        let stage = entries.by_id.remove(&id)?;
        entries.by_source.retain(|_, v| *v != id);
        Some(stage)
    }

    /// Clear the entire cache.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.by_id.clear();
        entries.by_source.clear();
    }

    /// Get the number of cached stages.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    /// Check if cache is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_insert_get() {
        let cache = StageCache::new();
        let stage = Arc::new(Stage::new());
        let id = cache.insert(Arc::clone(&stage));

        let cached = cache.get(id).unwrap();
        assert!(Arc::ptr_eq(&cached, &stage));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_ids_unique() {
        let cache = StageCache::new();
        let a = cache.insert(Arc::new(Stage::new()));
        let b = cache.insert(Arc::new(Stage::new()));
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_cache_erase_clear() {
        let cache = StageCache::new();
        let id = cache.insert(Arc::new(Stage::new()));
        cache.insert(Arc::new(Stage::new()));

        assert!(cache.erase(id).is_some());
        assert!(cache.get(id).is_none());
        assert!(cache.erase(id).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_miss() {
        let cache = StageCache::new();
        assert!(cache.find(Path::new("/nonexistent/scene.json")).is_none());
        assert!(cache.open("/nonexistent/scene.json").is_err());
    }
}
