//! Filesystem-based cache store with per-entry expiry.
//!
//! Stores each entry as `<key>.json` in the cache directory, wrapped in an
//! envelope carrying its absolute expiry time. Pointing multiple service
//! instances at a shared cache directory shares the entries between them.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::FileSet;

/// On-disk envelope for one cached file set.
#[derive(Debug, Serialize, Deserialize)]
struct CachedEntry {
    /// Unix timestamp (seconds) after which the entry is stale.
    expires_at: u64,
    files: FileSet,
}

/// Filesystem-based cache store.
pub struct FileStore {
    cache_dir: Option<PathBuf>,
}

impl FileStore {
    /// Create a new file store using the default cache directory.
    pub fn new() -> Self {
        let cache_dir =
            dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("cache"));
        Self { cache_dir }
    }

    /// Create a file store with a specific cache directory.
    pub fn new_with_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir: Some(cache_dir),
        }
    }

    /// Get a cached file set by key.
    ///
    /// Any failure (missing file, unreadable, unparseable) is a miss, never
    /// an error. Expired entries are removed and reported as misses.
    pub fn get(&self, key: &str) -> Option<FileSet> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return None;
        }

        let content = std::fs::read_to_string(&path).ok()?;
        let entry: CachedEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(key, %err, "discarding unparseable cache entry");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };

        if entry.expires_at <= unix_now() {
            debug!(key, "cache entry expired");
            let _ = std::fs::remove_file(&path);
            return None;
        }

        Some(entry.files)
    }

    /// Store a file set by key, expiring `ttl` from now.
    ///
    /// Write failures are logged and swallowed: a full disk or read-only
    /// cache volume must not fail the request.
    pub fn put(&self, key: &str, files: &FileSet, ttl: Duration) {
        let Some(path) = self.key_path(key) else {
            return;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let entry = CachedEntry {
            expires_at: unix_now().saturating_add(ttl.as_secs()),
            files: files.clone(),
        };

        let content = match serde_json::to_string(&entry) {
            Ok(c) => c,
            Err(err) => {
                warn!(key, %err, "failed to serialize cache entry");
                return;
            }
        };

        if let Err(err) = std::fs::write(&path, content) {
            warn!(key, %err, "failed to write cache entry");
        }
    }

    /// Remove all cached entries.
    pub fn clear(&self) -> Result<CacheStats, std::io::Error> {
        let stats = self.stats();
        if let Some(ref dir) = self.cache_dir {
            if dir.exists() {
                std::fs::remove_dir_all(dir)?;
            }
        }
        stats
    }

    /// Compute statistics about the cache.
    pub fn stats(&self) -> Result<CacheStats, std::io::Error> {
        let Some(ref dir) = self.cache_dir else {
            return Ok(CacheStats {
                entries: 0,
                total_bytes: 0,
            });
        };

        if !dir.exists() {
            return Ok(CacheStats {
                entries: 0,
                total_bytes: 0,
            });
        }

        let mut entries: usize = 0;
        let mut total_bytes: u64 = 0;

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                entries += 1;
                total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }

        Ok(CacheStats {
            entries,
            total_bytes,
        })
    }

    /// Return the cache directory path.
    pub fn path(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }

    /// Get the file path for a cache key.
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{key}.json")))
    }
}

/// Seconds since the Unix epoch.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Statistics about the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entries.
    pub entries: usize,
    /// Total size in bytes.
    pub total_bytes: u64,
}

impl CacheStats {
    /// Format total_bytes as a human-readable string.
    pub fn human_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;

        if self.total_bytes >= MB {
            format!("{:.1} MiB", self.total_bytes as f64 / MB as f64)
        } else if self.total_bytes >= KB {
            format!("{:.1} KiB", self.total_bytes as f64 / KB as f64)
        } else {
            format!("{} B", self.total_bytes)
        }
    }
}
