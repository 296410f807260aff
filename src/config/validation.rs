//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits and windows > 0)
//! - Validate identifiers (repository `owner/name`, API URL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{AppConfig, RateLimitBackend};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `github.repository`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check an already-deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.github.token.trim().is_empty() {
        errors.push(ValidationError::new("github.token", "must be set (GITHUB_TOKEN)"));
    }

    if split_repository(&config.github.repository).is_none() {
        errors.push(ValidationError::new(
            "github.repository",
            format!("expected owner/name, got '{}'", config.github.repository),
        ));
    }

    if config.github.base_branch.trim().is_empty() {
        errors.push(ValidationError::new("github.base_branch", "must not be empty"));
    }

    if let Err(e) = url::Url::parse(&config.github.api_url) {
        errors.push(ValidationError::new(
            "github.api_url",
            format!("invalid URL '{}': {}", config.github.api_url, e),
        ));
    }

    if config.submission.allowed_paths.is_empty() {
        errors.push(ValidationError::new(
            "submission.allowed_paths",
            "at least one editable folder is required",
        ));
    }

    if config.orchestrator.branch_prefix.trim().is_empty() {
        errors.push(ValidationError::new("orchestrator.branch_prefix", "must not be empty"));
    }

    if config.rate_limit.backend != RateLimitBackend::Disabled {
        if config.rate_limit.submissions_per_window == 0 {
            errors.push(ValidationError::new(
                "rate_limit.submissions_per_window",
                "must be greater than zero",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new("rate_limit.window_secs", "must be greater than zero"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Split `owner/name` into its two non-empty parts.
pub fn split_repository(repository: &str) -> Option<(&str, &str)> {
    let (owner, name) = repository.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}
