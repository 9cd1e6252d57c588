//! Device-local key-value store
//!
//! Thin wrapper around sled that stores raw byte values under string keys.
//! Writes become durable once [`KvStore::flush`] resolves.

use crate::{Result, StorageError};
use sled::Db;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: PathBuf,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Background flush interval in milliseconds (None disables it)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("primatech_kv.db"),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Key-value store implementation
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
    #[cfg(test)]
    fail_flush: Arc<AtomicBool>,
}

impl KvStore {
    /// Open a key-value store with configuration
    pub fn open(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        if let Some(ms) = config.flush_every_ms {
            db_config = db_config.flush_every_ms(Some(ms));
        }

        let db = db_config.open()?;
        tracing::debug!(path = %config.path.display(), "opened key-value store");

        Ok(Self::from_db(db))
    }

    /// Create an in-memory key-value store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self::from_db(db))
    }

    fn from_db(db: Db) -> Self {
        Self {
            db: Arc::new(db),
            #[cfg(test)]
            fail_flush: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every following flush fail
    #[cfg(test)]
    pub(crate) fn fail_flushes(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    /// Get the raw bytes stored under a key
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key.as_bytes())?.map(|bytes| bytes.to_vec()))
    }

    /// Get a value stored under a key as a UTF-8 string
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    /// Store raw bytes under a key
    pub fn set_raw(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db.insert(key.as_bytes(), value)?;
        Ok(())
    }

    /// Remove a value by key, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }

    /// Flush pending writes to disk
    ///
    /// The flush runs on the blocking pool so the caller's task is never
    /// stalled on disk I/O.
    pub async fn flush(&self) -> Result<()> {
        #[cfg(test)]
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("flush failed".to_string()));
        }

        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.flush())
            .await
            .map_err(|e| StorageError::Task(e.to_string()))??;
        Ok(())
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}
