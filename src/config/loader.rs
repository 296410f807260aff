//! Configuration loading from disk and environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, message } => write!(f, "Invalid {}: {}", name, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_config_with_env(path, &env)
}

/// Same as [`load_config`] with an explicit environment, so tests never touch process state.
pub fn load_config_with_env(
    path: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the deployment variables onto a parsed config.
pub fn apply_env_overrides(
    config: &mut AppConfig,
    env: &HashMap<String, String>,
) -> Result<(), ConfigError> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(token) = get("GITHUB_TOKEN") {
        config.github.token = token.to_string();
    }
    if let Some(repo) = get("GITHUB_REPO") {
        config.github.repository = repo.to_string();
    }
    if let Some(branch) = get("GITHUB_BASE_BRANCH") {
        config.github.base_branch = branch.to_string();
    }
    if let Some(api_url) = get("GITHUB_API_URL") {
        config.github.api_url = api_url.to_string();
    }
    if let Some(origins) = get("ALLOWED_ORIGINS") {
        config.cors.allowed_origins = parse_origin_list(origins);
    }
    if let Some(limit) = get("RATE_LIMIT_PER_HOUR") {
        config.rate_limit.submissions_per_window =
            limit.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                name: "RATE_LIMIT_PER_HOUR",
                message: format!("'{}': {}", limit, e),
            })?;
    }
    if let Some(bind) = get("BIND_ADDRESS") {
        config.listener.bind_address = bind.to_string();
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level.to_string();
    }

    Ok(())
}

/// Parse a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
