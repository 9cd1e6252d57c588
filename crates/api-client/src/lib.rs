//! Book catalog API client
//!
//! This crate provides the HTTP client for the catalog backend: login,
//! registration and profile retrieval, with error normalization into
//! [`RequestError`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod gateway;
pub mod types;

pub use client::{ApiClient, ApiClientConfig, RequestError};
pub use gateway::AuthGateway;
pub use types::{FieldErrors, LoginResponse, RegisterResponse, UserId, UserProfile};

/// Result type for client construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an [`ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
