//! Shared key-value storage for rate-limit records.
//!
//! # Data Flow
//! ```text
//! RateLimiter
//!     → KvStore::get("ratelimit:<client>")   (JSON record or nothing)
//!     → KvStore::put("ratelimit:<client>", record, ttl)
//! ```
//!
//! # Design Decisions
//! - The store is chosen once at startup and injected as `Arc<dyn KvStore>`
//! - No compare-and-swap: callers accept last-writer-wins
//! - `NoopStore` stands in when no backend is configured

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal eventually-consistent key-value capability.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the raw value stored under `key`, if any and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, expiring after `ttl` unless overwritten.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;
}

/// Store that remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl KvStore for NoopStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), StoreError> {
        Ok(())
    }
}
