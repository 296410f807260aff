//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (step, branch, client, reason) instead of formatted strings
//! - Request ID flows through every log line of a request via the trace span
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
