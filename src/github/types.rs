//! Repository host types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur talking to the repository host.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Connection or protocol failure before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The configured API URL cannot address repository endpoints.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Result type for repository host operations.
pub type GithubResult<T> = Result<T, GithubError>;

/// A file read from a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Blob hash, required by the host to update the file.
    pub sha: String,
    /// Decoded UTF-8 content.
    pub content: String,
}

/// Outcome of a best-effort file read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLookup {
    Present(RemoteFile),
    /// The host reported the file does not exist.
    Absent,
    /// The read failed for another reason; the file may or may not exist.
    Unknown(String),
}

/// Create-or-update of one file on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub branch: String,
    pub message: String,
    /// Plain text; encoded for transport by the client.
    pub content: String,
    /// Hash of the blob being replaced. `None` creates the file.
    pub sha: Option<String>,
}

/// Pull request to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// The created pull request as reported back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestResult {
    pub number: u64,
    #[serde(rename = "html_url")]
    pub url: String,
}

// Wire shapes of the REST API.

#[derive(Debug, Deserialize)]
pub(crate) struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PutContentBody<'a> {
    pub message: &'a str,
    pub content: String,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePullBody<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GithubError::Api {
            status: 422,
            message: "Reference already exists".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 422: Reference already exists");
    }

    #[test]
    fn test_pull_request_decode() {
        let pr: PullRequestResult = serde_json::from_str(
            r#"{"number":17,"html_url":"https://github.com/acme/wiki/pull/17","state":"open"}"#,
        )
        .unwrap();
        assert_eq!(pr.number, 17);
        assert_eq!(pr.url, "https://github.com/acme/wiki/pull/17");
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let body = PutContentBody {
            message: "m",
            content: "Yg==".to_string(),
            branch: "b",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
    }
}
