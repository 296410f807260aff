//! Orchestration steps, branch naming and failure type.

use std::fmt;

use thiserror::Error;

use crate::github::GithubError;

/// The ordered steps of turning a submission into a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ResolveBaseRef,
    CreateBranch,
    FetchExistingFile,
    ComposeContent,
    WriteFile,
    OpenPullRequest,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 6] = [
        Step::ResolveBaseRef,
        Step::CreateBranch,
        Step::FetchExistingFile,
        Step::ComposeContent,
        Step::WriteFile,
        Step::OpenPullRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ResolveBaseRef => "resolve_base_ref",
            Step::CreateBranch => "create_branch",
            Step::FetchExistingFile => "fetch_existing_file",
            Step::ComposeContent => "compose_content",
            Step::WriteFile => "write_file",
            Step::OpenPullRequest => "open_pull_request",
        }
    }

    /// Whether a failure at this step leaves a branch behind.
    pub fn leaves_branch(&self) -> bool {
        matches!(self, Step::WriteFile | Step::OpenPullRequest)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed remote step. Carries operator detail; never shown to the submitter.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct UpstreamError {
    pub step: Step,
    /// Branch created before the failure, if any.
    pub branch: Option<String>,
    /// True when that branch was removed again.
    pub branch_deleted: bool,
    pub source: GithubError,
}

impl UpstreamError {
    /// Branch left on the remote by this failure.
    pub fn orphaned_branch(&self) -> Option<&str> {
        if self.branch_deleted {
            None
        } else {
            self.branch.as_deref()
        }
    }
}

/// A branch to cut for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCreationRequest {
    pub name: String,
    pub base_sha: String,
}

impl BranchCreationRequest {
    pub fn new(prefix: &str, file_path: &str, created_at_ms: u64, base_sha: String) -> Self {
        Self {
            name: branch_name(prefix, file_path, created_at_ms),
            base_sha,
        }
    }
}

/// `<prefix>/<sanitized path>-<millis>`.
pub fn branch_name(prefix: &str, file_path: &str, created_at_ms: u64) -> String {
    let sanitized: String = file_path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{}/{}-{}", prefix, sanitized, created_at_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name() {
        assert_eq!(
            branch_name("edit-suggestion", "Characters/Bob Smith.md", 1_700_000_000_123),
            "edit-suggestion/characters-bob-smith-md-1700000000123"
        );
        assert_eq!(
            branch_name("edit-suggestion", "Locations/Café.md", 1),
            "edit-suggestion/locations-caf--md-1"
        );
    }

    #[test]
    fn test_branch_request_is_unique_per_timestamp() {
        let a = BranchCreationRequest::new("p", "Characters/Bob.md", 1, "sha".into());
        let b = BranchCreationRequest::new("p", "Characters/Bob.md", 2, "sha".into());
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn test_orphaned_branch() {
        let mut err = UpstreamError {
            step: Step::WriteFile,
            branch: Some("edit-suggestion/x-1".into()),
            branch_deleted: false,
            source: GithubError::Decode("boom".into()),
        };
        assert_eq!(err.orphaned_branch(), Some("edit-suggestion/x-1"));
        assert_eq!(err.to_string(), "write_file failed: Unexpected response: boom");

        err.branch_deleted = true;
        assert_eq!(err.orphaned_branch(), None);
    }

    #[test]
    fn test_step_order() {
        let leaving: Vec<_> = Step::ALL.iter().filter(|s| s.leaves_branch()).collect();
        assert_eq!(leaving, vec![&Step::WriteFile, &Step::OpenPullRequest]);
    }
}
