//! Backing store abstraction for cached responses.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

/// Error del backing store. Nunca llega al cliente HTTP.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cache connection failed: {0}")]
    Connection(String),

    #[error("cache command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    #[error("cache command {command} timed out after {timeout:?}")]
    Timeout {
        command: &'static str,
        timeout: Duration,
    },
}

impl CacheError {
    pub fn command(command: &'static str, err: impl ToString) -> Self {
        Self::Command {
            command,
            message: err.to_string(),
        }
    }
}

/// Key/value store holding serialized response bodies.
///
/// Single-key operations are expected to be atomic; nothing else is. Patterns
/// are globs (`*`, `?`, `[...]`) matched against the whole key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Returns the stored bytes, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry and its TTL.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    /// Lists the keys matching `pattern`.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Deletes `keys`, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Checks the backend is reachable.
    async fn ping(&self) -> Result<(), CacheError>;
}
