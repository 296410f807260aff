//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the submission pipeline and health route
//! - Wire up middleware (request ID, tracing, timeout)
//! - Build the shared pipeline components once per process
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, RateLimitBackend};
use crate::github::{GithubClient, GithubResult, RepositoryHost};
use crate::http::handlers;
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::orchestrator::PullRequestOrchestrator;
use crate::security::{AccessGate, RateLimiter};
use crate::store::{KvStore, MemoryStore, NoopStore};
use crate::submission::SubmissionValidator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub validator: Arc<SubmissionValidator>,
    pub limiter: RateLimiter,
    pub orchestrator: PullRequestOrchestrator,
    pub client_ip_header: Option<String>,
    pub max_body_size: usize,
}

impl AppState {
    pub fn new(config: &AppConfig, host: Arc<dyn RepositoryHost>, store: Arc<dyn KvStore>) -> Self {
        Self {
            gate: Arc::new(AccessGate::new(&config.cors)),
            validator: Arc::new(SubmissionValidator::new(config.submission.clone())),
            limiter: RateLimiter::new(store, &config.rate_limit),
            orchestrator: PullRequestOrchestrator::new(
                host,
                config.github.base_branch.clone(),
                &config.orchestrator,
            ),
            client_ip_header: config.rate_limit.client_ip_header.clone(),
            max_body_size: config.security.max_body_size,
        }
    }
}

/// HTTP server for the suggestion gateway.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    sweeper: Option<MemoryStore>,
}

impl HttpServer {
    /// Create a server talking to the configured GitHub repository.
    pub fn new(config: AppConfig) -> GithubResult<Self> {
        let host: Arc<dyn RepositoryHost> = Arc::new(GithubClient::new(&config.github)?);

        let (store, sweeper): (Arc<dyn KvStore>, Option<MemoryStore>) = match config.rate_limit.backend {
            RateLimitBackend::Memory => {
                let store = MemoryStore::new();
                (Arc::new(store.clone()), Some(store))
            }
            RateLimitBackend::Disabled => {
                tracing::warn!("Rate limit store disabled, submissions will not be throttled");
                (Arc::new(NoopStore), None)
            }
        };

        let mut server = Self::with_dependencies(config, host, store);
        server.sweeper = sweeper;
        Ok(server)
    }

    /// Create a server over an explicit repository host and store.
    pub fn with_dependencies(
        config: AppConfig,
        host: Arc<dyn RepositoryHost>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        let state = AppState::new(&config, host, store);
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            sweeper: None,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health).fallback(handlers::submit))
            .fallback(handlers::submit)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            repository = %self.config.github.repository,
            base_branch = %self.config.github.base_branch,
            "HTTP server starting"
        );

        let sweeper = self.sweeper.as_ref().map(|store| {
            let every = Duration::from_secs(self.config.rate_limit.window_secs.max(1));
            store.spawn_sweeper(every, shutdown.resubscribe())
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        if let Some(handle) = sweeper {
            let _ = handle.await;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
