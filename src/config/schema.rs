//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edit gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote repository host settings.
    pub github: GithubConfig,

    /// Origin allow-list and preflight settings.
    pub cors: CorsConfig,

    /// Editable path rules and size bounds.
    pub submission: SubmissionConfig,

    /// Per-client submission throttling.
    pub rate_limit: RateLimitConfig,

    /// Branch / pull request orchestration settings.
    pub orchestrator: OrchestratorConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Remote repository host (GitHub REST API) configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Bearer credential with `contents` and `pull_requests` write access.
    pub token: String,

    /// Target repository as `owner/name`.
    pub repository: String,

    /// Branch proposals are cut from and merged into.
    pub base_branch: String,

    /// REST API root. Override for GitHub Enterprise.
    pub api_url: String,

    /// User-Agent sent with every API call (GitHub rejects requests without one).
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            repository: String::new(),
            base_branch: "main".to_string(),
            api_url: "https://api.github.com".to_string(),
            user_agent: "edit-gateway".to_string(),
        }
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("repository", &self.repository)
            .field("base_branch", &self.base_branch)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to submit (exact match, e.g. "https://docs.example.org").
    pub allowed_origins: Vec<String>,

    /// Lifetime of a preflight decision in the browser cache.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_secs: 86_400,
        }
    }
}

/// Submission validation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Top-level folders that may be edited.
    pub allowed_paths: Vec<String>,

    /// Top-level folders that may never be edited. Checked before `allowed_paths`.
    pub excluded_paths: Vec<String>,

    /// Maximum description length in characters.
    pub max_description_length: usize,

    /// Maximum replacement content length in characters.
    pub max_content_length: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            allowed_paths: ["Characters", "Locations", "Groups", "Assets"]
                .map(String::from)
                .to_vec(),
            excluded_paths: ["Journal", "TODO", "Feelings", "Private", "Templates"]
                .map(String::from)
                .to_vec(),
            max_description_length: 2_000,
            max_content_length: 50_000,
        }
    }
}

/// Backing store for rate-limit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Process-local map with per-entry expiry.
    Memory,
    /// No store; every submission is admitted.
    Disabled,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub backend: RateLimitBackend,

    /// Accepted submissions per client per window.
    pub submissions_per_window: u32,

    /// Sliding window length in seconds.
    pub window_secs: u64,

    /// Header carrying the client address when behind a trusted proxy
    /// (e.g. "CF-Connecting-IP"). When unset the TCP peer address is used.
    pub client_ip_header: Option<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            backend: RateLimitBackend::Memory,
            submissions_per_window: 5,
            window_secs: 3_600,
            client_ip_header: None,
        }
    }
}

/// Orchestrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Prefix of generated branch names.
    pub branch_prefix: String,

    /// Try once to delete the branch created for a submission whose later step failed.
    pub delete_orphaned_branches: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            branch_prefix: "edit-suggestion".to_string(),
            delete_orphaned_branches: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 128 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
