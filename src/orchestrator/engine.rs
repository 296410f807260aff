//! Sequential branch → commit → pull request transaction.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::OrchestratorConfig;
use crate::github::{FileLookup, FileWrite, GithubError, NewPullRequest, PullRequestResult, RepositoryHost};
use crate::orchestrator::types::{BranchCreationRequest, Step, UpstreamError};
use crate::submission::compose::compose_content;
use crate::submission::Submission;

/// Drives one submission through the remote steps, strictly in order.
///
/// There are no retries. A failure after the branch exists leaves it behind
/// unless `delete_orphaned_branches` is set, in which case one deletion is
/// attempted.
#[derive(Clone)]
pub struct PullRequestOrchestrator {
    host: Arc<dyn RepositoryHost>,
    base_branch: String,
    branch_prefix: String,
    delete_orphaned_branches: bool,
}

impl PullRequestOrchestrator {
    pub fn new(host: Arc<dyn RepositoryHost>, base_branch: impl Into<String>, config: &OrchestratorConfig) -> Self {
        Self {
            host,
            base_branch: base_branch.into(),
            branch_prefix: config.branch_prefix.clone(),
            delete_orphaned_branches: config.delete_orphaned_branches,
        }
    }

    /// Materialize a validated submission as a pull request.
    pub async fn create_change(&self, submission: &Submission) -> Result<PullRequestResult, UpstreamError> {
        self.create_change_at(submission, now_millis()).await
    }

    pub(crate) async fn create_change_at(
        &self,
        submission: &Submission,
        created_at_ms: u64,
    ) -> Result<PullRequestResult, UpstreamError> {
        let file = submission.file_path.as_str();

        // 1. Resolve base ref
        let base_sha = self
            .host
            .branch_head(&self.base_branch)
            .await
            .map_err(|e| failed(Step::ResolveBaseRef, e))?;

        // 2. Create branch
        let branch = BranchCreationRequest::new(&self.branch_prefix, file, created_at_ms, base_sha);
        self.host
            .create_branch(&branch.name, &branch.base_sha)
            .await
            .map_err(|e| failed(Step::CreateBranch, e))?;
        tracing::info!(branch = %branch.name, base_sha = %branch.base_sha, file = %file, "Branch created");

        // 3. Fetch existing file (advisory)
        let (existing, existing_sha) = match self.host.get_file(file, &self.base_branch).await {
            FileLookup::Present(found) => (found.content, Some(found.sha)),
            FileLookup::Absent => (String::new(), None),
            FileLookup::Unknown(reason) => {
                // Treated like a missing file. The write below then carries no
                // hash and the host refuses it if the file does exist.
                tracing::warn!(step = %Step::FetchExistingFile, file = %file, reason = %reason, "Existing file unreadable, composing from empty");
                (String::new(), None)
            }
        };

        // 4. Compose
        let content = compose_content(submission, &existing);
        tracing::debug!(step = %Step::ComposeContent, bytes = content.len(), replaced = submission.content.is_some(), "Content composed");

        // 5. Write file
        let write = FileWrite {
            path: file.to_string(),
            branch: branch.name.clone(),
            message: format!("Edit suggestion: {}\n\n{}", file, submission.description),
            content,
            sha: existing_sha,
        };
        if let Err(e) = self.host.put_file(&write).await {
            return Err(self.abandon(Step::WriteFile, branch.name, e).await);
        }

        // 6. Open pull request
        let pr = NewPullRequest {
            title: format!("Edit suggestion: {}", file),
            head: branch.name.clone(),
            base: self.base_branch.clone(),
            body: pull_request_body(submission),
        };
        match self.host.create_pull_request(&pr).await {
            Ok(result) => {
                tracing::info!(number = result.number, url = %result.url, branch = %branch.name, "Pull request opened");
                Ok(result)
            }
            Err(e) => Err(self.abandon(Step::OpenPullRequest, branch.name, e).await),
        }
    }

    /// Build the error for a failure after branch creation, optionally removing the branch.
    async fn abandon(&self, step: Step, branch: String, source: GithubError) -> UpstreamError {
        let mut branch_deleted = false;
        if self.delete_orphaned_branches {
            match self.host.delete_branch(&branch).await {
                Ok(()) => {
                    tracing::info!(branch = %branch, step = %step, "Removed branch of failed submission");
                    branch_deleted = true;
                }
                Err(e) => {
                    tracing::warn!(branch = %branch, step = %step, error = %e, "Could not remove branch of failed submission");
                }
            }
        }
        UpstreamError {
            step,
            branch: Some(branch),
            branch_deleted,
            source,
        }
    }
}

/// Failure before any branch exists.
fn failed(step: Step, source: GithubError) -> UpstreamError {
    UpstreamError {
        step,
        branch: None,
        branch_deleted: false,
        source,
    }
}

/// Markdown body of the generated pull request.
pub fn pull_request_body(submission: &Submission) -> String {
    format!(
        "## Edit Suggestion\n\n\
         **Submitted by:** {}\n\n\
         **Description:**\n{}\n\n\
         **File:** `{}`\n\n\
         ---\n\n\
         This edit was submitted via the anonymous edit suggestion feature.\n\
         Please review the changes and merge if appropriate.",
        submission.display_name(),
        submission.description,
        submission.file_path,
    )
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
