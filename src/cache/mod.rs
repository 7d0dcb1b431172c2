//! Fetched-content cache.
//!
//! Caches the file set fetched from a repository so that repeated reviews
//! of the same repository at the same candidate level skip the expensive,
//! rate-limited hosting-provider traversal. Only the fetch is cached, not
//! the review: the key deliberately excludes the assignment description,
//! so a new assignment text against the same repository reuses the entry.

pub mod store;

use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::github::RepoId;
use crate::models::{CandidateLevel, FileSet};

/// Compute a cache key from the repository locator and candidate level.
///
/// Stable across process restarts: no salt, no timestamp. Two requests
/// with the same locator and level always collide on this key.
pub fn cache_key(repo: &RepoId, level: CandidateLevel) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repo.full_name().as_bytes());
    hasher.update(b":");
    hasher.update(level.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// The cache engine for fetched repository content.
pub struct CacheEngine {
    enabled: bool,
    ttl: Duration,
    store: store::FileStore,
}

impl CacheEngine {
    /// Create a new cache engine.
    ///
    /// `dir = None` uses the default cache directory under the user config
    /// dir. Entries expire `ttl` after they are written.
    pub fn new(enabled: bool, dir: Option<std::path::PathBuf>, ttl: Duration) -> Self {
        let store = match dir {
            Some(dir) => store::FileStore::new_with_dir(dir),
            None => store::FileStore::new(),
        };
        Self {
            enabled,
            ttl,
            store,
        }
    }

    /// Look up a cached file set. Expired or unreadable entries are misses.
    pub fn get(&self, key: &str) -> Option<FileSet> {
        if !self.enabled {
            return None;
        }
        self.store.get(key)
    }

    /// Store a file set. Failures are logged by the store and swallowed;
    /// review correctness never depends on the cache being writable.
    pub fn put(&self, key: &str, files: &FileSet) {
        if !self.enabled {
            return;
        }
        self.store.put(key, files, self.ttl);
    }

    /// Remove all cached entries.
    pub fn clear(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.clear()
    }

    /// Compute statistics about the cache.
    pub fn stats(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.stats()
    }

    /// Return the cache directory path.
    pub fn path(&self) -> Option<&std::path::PathBuf> {
        self.store.path()
    }
}
