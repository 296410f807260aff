//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (method + origin allow-list, CORS preflight)
//!     → headers.rs (derive client identity)
//!     → rate_limit.rs (sliding window per client)
//!     → Pass to submission validation
//! ```
//!
//! # Design Decisions
//! - Origin and method checks fail closed
//! - Rate limiting fails open when its store is unavailable
//! - No trust in forwarding headers unless configured

pub mod access_control;
pub mod headers;
pub mod rate_limit;

pub use access_control::{AccessGate, Admission, GateError};
pub use headers::client_identity;
pub use rate_limit::{RateLimitRecord, RateLimiter};
