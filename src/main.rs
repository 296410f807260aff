//! Edit suggestion gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────────────┐
//!                  │                     EDIT GATEWAY                          │
//!                  │                                                           │
//!   Browser POST   │  ┌────────────┐   ┌─────────────┐   ┌──────────────────┐  │
//!   ───────────────┼─▶│ access     │──▶│ rate limit  │──▶│ submission       │  │
//!                  │  │ gate (CORS)│   │ check       │   │ validation       │  │
//!                  │  └────────────┘   └─────────────┘   └────────┬─────────┘  │
//!                  │                                             │            │
//!                  │                                             ▼            │
//!   JSON response  │  ┌────────────┐   ┌─────────────┐   ┌──────────────────┐  │   GitHub
//!   ◀──────────────┼──│ response   │◀──│ rate limit  │◀──│ pull request     │◀─┼──▶ REST API
//!                  │  │ formatter  │   │ record      │   │ orchestrator     │  │
//!                  │  └────────────┘   └─────────────┘   └──────────────────┘  │
//!                  └───────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use edit_gateway::config::load_config;
use edit_gateway::lifecycle;
use edit_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "edit-gateway")]
#[command(about = "Turns anonymous edit suggestions into GitHub pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "EDIT_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("edit-gateway: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        repository = %config.github.repository,
        allowed_origins = config.cors.allowed_origins.len(),
        rate_limit_backend = ?config.rate_limit.backend,
        "edit-gateway starting"
    );

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
