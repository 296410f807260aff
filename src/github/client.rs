//! GitHub REST client.
//!
//! # Responsibilities
//! - Address repository endpoints under the configured API root
//! - Authenticate every call with the bearer credential
//! - Translate non-success statuses into `GithubError::Api`
//! - Encode file content for the contents API

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::config::validation::split_repository;
use crate::config::GithubConfig;
use crate::github::types::{
    ContentResponse, CreatePullBody, CreateRefBody, FileLookup, FileWrite, GitRef, GithubError,
    GithubResult, NewPullRequest, PullRequestResult, PutContentBody, RemoteFile,
};
use crate::github::RepositoryHost;

const API_VERSION: &str = "2022-11-28";

/// Client for one repository.
#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    api_url: Url,
    owner: String,
    name: String,
}

impl GithubClient {
    /// Build a client from configuration.
    pub fn new(config: &GithubConfig) -> GithubResult<Self> {
        let api_url: Url = config
            .api_url
            .parse()
            .map_err(|e| GithubError::InvalidUrl(format!("'{}': {}", config.api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(GithubError::InvalidUrl(config.api_url.clone()));
        }

        let (owner, name) = split_repository(&config.repository).ok_or_else(|| {
            GithubError::InvalidUrl(format!("bad repository '{}'", config.repository))
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GithubError::InvalidUrl("token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("edit-gateway"));
        headers.insert(USER_AGENT, user_agent);

        let http = Client::builder().default_headers(headers).build()?;

        tracing::info!(
            api_url = %api_url,
            repository = %config.repository,
            "Repository host client initialized"
        );

        Ok(Self {
            http,
            api_url,
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// `{api}/repos/{owner}/{name}/{segments...}`, each segment percent-encoded.
    pub(crate) fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> GithubResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.name.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn branch_ref_endpoint(&self, kind: &'static str, branch: &str) -> GithubResult<Url> {
        self.endpoint(["git", kind, "heads"].into_iter().chain(branch.split('/')))
    }

    fn contents_endpoint(&self, path: &str) -> GithubResult<Url> {
        self.endpoint(std::iter::once("contents").chain(path.split('/')))
    }
}

/// Pass successful responses through, turn the rest into `GithubError::Api`.
async fn ensure_success(response: Response) -> GithubResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GithubError::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            message
        },
    })
}

/// Decode the `content` field of a contents response.
fn decode_content(file: &ContentResponse) -> Result<String, String> {
    match file.encoding.as_deref() {
        Some("base64") | None => {}
        Some(other) => return Err(format!("unsupported encoding '{}'", other)),
    }
    let encoded: String = file
        .content
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = BASE64.decode(encoded).map_err(|e| format!("invalid base64: {}", e))?;
    String::from_utf8(bytes).map_err(|_| "content is not UTF-8".to_string())
}

#[async_trait]
impl RepositoryHost for GithubClient {
    async fn branch_head(&self, branch: &str) -> GithubResult<String> {
        let url = self.branch_ref_endpoint("ref", branch)?;
        let response = ensure_success(self.http.get(url).send().await?).await?;
        let git_ref: GitRef = response
            .json()
            .await
            .map_err(|e| GithubError::Decode(format!("branch ref: {}", e)))?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> GithubResult<()> {
        let url = self.endpoint(["git", "refs"])?;
        let body = CreateRefBody {
            git_ref: format!("refs/heads/{}", branch),
            sha,
        };
        ensure_success(self.http.post(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn get_file(&self, path: &str, git_ref: &str) -> FileLookup {
        let mut url = match self.contents_endpoint(path) {
            Ok(url) => url,
            Err(e) => return FileLookup::Unknown(e.to_string()),
        };
        url.query_pairs_mut().append_pair("ref", git_ref);

        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => return FileLookup::Unknown(e.to_string()),
        };
        if response.status() == StatusCode::NOT_FOUND {
            return FileLookup::Absent;
        }
        let response = match ensure_success(response).await {
            Ok(r) => r,
            Err(e) => return FileLookup::Unknown(e.to_string()),
        };
        let file: ContentResponse = match response.json().await {
            Ok(f) => f,
            Err(e) => return FileLookup::Unknown(format!("contents: {}", e)),
        };

        match decode_content(&file) {
            Ok(content) => FileLookup::Present(RemoteFile {
                sha: file.sha,
                content,
            }),
            Err(reason) => FileLookup::Unknown(reason),
        }
    }

    async fn put_file(&self, write: &FileWrite) -> GithubResult<()> {
        let url = self.contents_endpoint(&write.path)?;
        let body = PutContentBody {
            message: &write.message,
            content: BASE64.encode(write.content.as_bytes()),
            branch: &write.branch,
            sha: write.sha.as_deref(),
        };
        ensure_success(self.http.put(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn create_pull_request(&self, pr: &NewPullRequest) -> GithubResult<PullRequestResult> {
        let url = self.endpoint(["pulls"])?;
        let body = CreatePullBody {
            title: &pr.title,
            head: &pr.head,
            base: &pr.base,
            body: &pr.body,
        };
        let response = ensure_success(self.http.post(url).json(&body).send().await?).await?;
        response
            .json()
            .await
            .map_err(|e| GithubError::Decode(format!("pull request: {}", e)))
    }

    async fn delete_branch(&self, branch: &str) -> GithubResult<()> {
        let url = self.branch_ref_endpoint("refs", branch)?;
        ensure_success(self.http.delete(url).send().await?).await?;
        Ok(())
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GithubConfig {
        GithubConfig {
            token: "test-token".to_string(),
            repository: "acme/wiki".to_string(),
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_paths() {
        let client = GithubClient::new(&test_config()).unwrap();

        assert_eq!(
            client.endpoint(["pulls"]).unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/acme/wiki/pulls"
        );
        assert_eq!(
            client
                .branch_ref_endpoint("ref", "edit-suggestion/characters-bob-md-1")
                .unwrap()
                .as_str(),
            "https://ghe.example.com/api/v3/repos/acme/wiki/git/ref/heads/edit-suggestion/characters-bob-md-1"
        );
        assert_eq!(
            client.contents_endpoint("Characters/Bob Smith.md").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/acme/wiki/contents/Characters/Bob%20Smith.md"
        );
    }

    #[test]
    fn test_segments_cannot_escape() {
        let client = GithubClient::new(&test_config()).unwrap();
        let url = client.contents_endpoint("Characters/a?b#c.md").unwrap();
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_rejects_bad_repository() {
        let mut config = test_config();
        config.repository = "wiki".to_string();
        assert!(matches!(GithubClient::new(&config), Err(GithubError::InvalidUrl(_))));
    }

    #[test]
    fn test_decode_content() {
        let file = ContentResponse {
            sha: "abc".to_string(),
            content: Some("IyBC\nb2IK\n".to_string()),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(decode_content(&file).unwrap(), "# Bob\n");

        let binary = ContentResponse {
            sha: "abc".to_string(),
            content: Some(BASE64.encode([0xff, 0xfe])),
            encoding: Some("base64".to_string()),
        };
        assert!(decode_content(&binary).is_err());

        let too_large = ContentResponse {
            sha: "abc".to_string(),
            content: Some(String::new()),
            encoding: Some("none".to_string()),
        };
        assert!(decode_content(&too_large).is_err());
    }
}
