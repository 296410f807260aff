//! Sliding-window submission throttling per client.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::RateLimitConfig;
use crate::store::KvStore;

/// Stored value under `ratelimit:<client>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Accepted submission times, Unix milliseconds, oldest first.
    pub submissions: Vec<u64>,
}

impl RateLimitRecord {
    /// Drop every timestamp at or before `cutoff_ms`.
    fn retain_after(&mut self, cutoff_ms: u64) {
        self.submissions.retain(|&ts| ts > cutoff_ms);
    }
}

/// Best-effort limiter over a shared, lock-free store.
///
/// `check` and `record` are separate read-modify-write steps, so two requests
/// from one client racing through the same instant may both be admitted.
/// Store failures fail open.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            limit: config.submissions_per_window,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Returns true when the client has used up its allowance.
    pub async fn check(&self, client_id: &str) -> bool {
        self.check_at(client_id, now_millis()).await
    }

    /// Record one accepted submission for the client.
    pub async fn record(&self, client_id: &str) {
        self.record_at(client_id, now_millis()).await
    }

    pub(crate) async fn check_at(&self, client_id: &str, now_ms: u64) -> bool {
        let Some(mut record) = self.load(client_id).await else {
            return false;
        };
        record.retain_after(self.cutoff(now_ms));

        let exceeded = record.submissions.len() >= self.limit as usize;
        if exceeded {
            tracing::debug!(
                client = %client_id,
                recent = record.submissions.len(),
                limit = self.limit,
                "Submission allowance used up"
            );
        }
        exceeded
    }

    pub(crate) async fn record_at(&self, client_id: &str, now_ms: u64) {
        let mut record = self.load(client_id).await.unwrap_or_default();
        record.retain_after(self.cutoff(now_ms));
        record.submissions.push(now_ms);

        let value = match serde_json::to_string(&record) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(client = %client_id, error = %e, "Failed to encode rate limit record");
                return;
            }
        };

        if let Err(e) = self.store.put(&storage_key(client_id), value, self.window * 2).await {
            tracing::warn!(client = %client_id, error = %e, "Rate limit update failed");
        }
    }

    /// Read and decode the stored record. Any failure reads as "no record".
    async fn load(&self, client_id: &str) -> Option<RateLimitRecord> {
        let raw = match self.store.get(&storage_key(client_id)).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(client = %client_id, error = %e, "Rate limit check failed, allowing");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(client = %client_id, error = %e, "Malformed rate limit record ignored");
                None
            }
        }
    }

    fn cutoff(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.window.as_millis() as u64)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Storage key for a client identity.
pub fn storage_key(client_id: &str) -> String {
    format!("ratelimit:{}", client_id)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
