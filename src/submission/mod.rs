//! Submission handling.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → types.rs (SubmissionRequest, all fields optional)
//!     → validation.rs (fields, lengths, path rules)
//!     → Submission
//!     → compose.rs (content to write)
//! ```

pub mod compose;
pub mod types;
pub mod validation;

pub use types::{Submission, SubmissionRequest};
pub use validation::{SubmissionValidator, ValidationError};
