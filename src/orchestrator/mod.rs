//! Pull request orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! validated Submission
//!     → resolve base ref        (no remote side effect yet)
//!     → create branch           (branch exists from here on)
//!     → fetch existing file     (advisory, never fails)
//!     → compose content
//!     → write file              (optimistic: carries the blob hash when updating)
//!     → open pull request
//!     → PullRequestResult { number, url }
//! ```
//!
//! # Design Decisions
//! - Steps run strictly in sequence; no parallel fan-out, no retries
//! - Resubmitting after a failure creates a fresh branch
//! - Orphaned branches are kept by default; cleanup is opt-in

pub mod engine;
pub mod types;

pub use engine::PullRequestOrchestrator;
pub use types::{branch_name, BranchCreationRequest, Step, UpstreamError};
