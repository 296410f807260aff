//! Anonymous edit-suggestion gateway.
//!
//! Accepts edit suggestions from a static documentation site and turns each
//! one into a branch, a commit and a pull request on a GitHub repository, so
//! that contributors need no account and the site needs no server-side
//! credentials.

// Core subsystems
pub mod config;
pub mod github;
pub mod http;
pub mod orchestrator;
pub mod submission;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
