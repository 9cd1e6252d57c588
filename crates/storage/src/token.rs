//! Session token store
//!
//! The token store is the only owner of the opaque session credential.
//! Everything else reads or writes it through [`TokenStore`].
//!
//! # Example
//!
//! ```rust
//! use storage::{KvStore, KvTokenStore, TokenStore};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = KvTokenStore::new(Arc::new(KvStore::in_memory()?));
//!
//! store.save("abc123").await?;
//! assert_eq!(store.get().await?.as_deref(), Some("abc123"));
//!
//! store.clear().await?;
//! assert!(store.get().await?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::kv::{KvConfig, KvStore};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Well-known key the session token is stored under
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable storage for the session token
///
/// All operations may suspend. A `save` or `clear` has taken effect once the
/// returned future resolves; callers must await it before acting on the new
/// state.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist the token, replacing any previous one
    async fn save(&self, token: &str) -> Result<()>;

    /// Read the stored token, if any
    async fn get(&self) -> Result<Option<String>>;

    /// Remove the stored token. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// Token store backed by the device key-value store
///
/// The token is kept as raw UTF-8 bytes, not as an encoded document.
pub struct KvTokenStore {
    kv: Arc<KvStore>,
    key: String,
}

impl KvTokenStore {
    /// Create a token store using the well-known key
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self::with_key(kv, AUTH_TOKEN_KEY)
    }

    /// Create a token store using a custom key
    pub fn with_key(kv: Arc<KvStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    /// Open the key-value store at `config.path` and wrap it
    pub fn open(config: KvConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(KvStore::open(config)?)))
    }

    /// The key the token lives under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Put back the value that was stored before a failed write
    fn restore(&self, previous: Option<Vec<u8>>) {
        let result = match previous {
            Some(bytes) => self.kv.set_raw(&self.key, &bytes),
            None => self.kv.remove(&self.key).map(|_| ()),
        };
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "could not restore session token");
        }
    }
}

#[async_trait]
impl TokenStore for KvTokenStore {
    /// A failed flush puts the previous token back before returning the error.
    async fn save(&self, token: &str) -> Result<()> {
        let previous = self.kv.get_raw(&self.key)?;
        self.kv.set_raw(&self.key, token.as_bytes())?;
        if let Err(e) = self.kv.flush().await {
            self.restore(previous);
            return Err(e);
        }
        tracing::debug!(key = %self.key, "session token saved");
        Ok(())
    }

    async fn get(&self) -> Result<Option<String>> {
        self.kv.get_string(&self.key)
    }

    /// A failed flush puts the removed token back before returning the error.
    async fn clear(&self) -> Result<()> {
        let previous = self.kv.get_raw(&self.key)?;
        let existed = self.kv.remove(&self.key)?;
        if let Err(e) = self.kv.flush().await {
            self.restore(previous);
            return Err(e);
        }
        tracing::debug!(key = %self.key, existed, "session token cleared");
        Ok(())
    }
}

/// In-process token store
///
/// Nothing survives the process. Useful for tests and for sessions that
/// must never touch the disk.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}
