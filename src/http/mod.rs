//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID, trace span)
//!     → handlers.rs (gate → rate check → validate → pull request → record)
//!     → response.rs (status code, JSON body, CORS header)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{ApiError, ResponseFormatter, SubmissionAccepted};
pub use server::{AppState, HttpServer};
