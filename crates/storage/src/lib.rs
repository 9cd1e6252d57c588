//! Storage layer for Primatech Books
//!
//! This crate provides the device-local key-value store and the session
//! token store built on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod token;

pub use kv::{KvConfig, KvStore};
pub use token::{KvTokenStore, MemoryTokenStore, TokenStore, AUTH_TOKEN_KEY};

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes were not valid UTF-8
    #[error("Invalid stored value: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Background flush task failed
    #[error("Storage task failed: {0}")]
    Task(String),

    /// Backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
