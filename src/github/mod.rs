//! Remote repository host integration.
//!
//! # Data Flow
//! ```text
//! AppConfig.github (token, owner/name, API root)
//!     → client.rs (authenticated REST calls)
//!     → RepositoryHost trait (consumed by the orchestrator)
//! ```
//!
//! # Security Constraints
//! - The bearer credential is only ever sent in the Authorization header
//! - Never log the credential or raw upstream response bodies at info level
//! - Repository paths are percent-encoded segment by segment

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::GithubClient;
pub use types::{
    FileLookup, FileWrite, GithubError, GithubResult, NewPullRequest, PullRequestResult,
    RemoteFile,
};

/// The remote operations the orchestrator needs.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Commit hash at the tip of `branch`.
    async fn branch_head(&self, branch: &str) -> GithubResult<String>;

    /// Create `branch` pointing at `sha`.
    async fn create_branch(&self, branch: &str, sha: &str) -> GithubResult<()>;

    /// Best-effort read of `path` at `git_ref`. Never fails.
    async fn get_file(&self, path: &str, git_ref: &str) -> FileLookup;

    /// Create or update a file on a branch.
    async fn put_file(&self, write: &FileWrite) -> GithubResult<()>;

    async fn create_pull_request(&self, pr: &NewPullRequest) -> GithubResult<PullRequestResult>;

    /// Remove `branch`. Only used to clean up after a failed submission.
    async fn delete_branch(&self, branch: &str) -> GithubResult<()>;
}
