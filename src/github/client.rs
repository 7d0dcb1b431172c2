//! GitHub REST v3 client.
//!
//! Thin reqwest wrapper over the repository and contents endpoints. All
//! requests carry a User-Agent (GitHub rejects anonymous agents), the
//! `application/vnd.github+json` accept header, and, when configured, a
//! bearer token for private repositories and higher rate limits.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::constants::USER_AGENT;

use super::{EntryKind, HostError, RepoEntry, RepoHost, RepoId};

/// Timeout applied to each individual API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub API client.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

/// One entry of a contents-API response.
#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
    download_url: Option<String>,
}

impl GithubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: Option<String>) -> Result<Self, HostError> {
        Self::new_with_base(crate::constants::GITHUB_API_BASE, token)
    }

    /// Create a client against a specific API base URL (GitHub Enterprise,
    /// or a test server).
    pub fn new_with_base(api_base: &str, token: Option<String>) -> Result<Self, HostError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HostError::Api(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Issue a GET against an API path and return the response.
    async fn get(&self, url: &str) -> Result<reqwest::Response, HostError> {
        let mut request = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HostError::Api(format!("request to {url} failed: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::NOT_FOUND => Err(HostError::NotFound),
            status => Err(HostError::Api(format!(
                "GitHub API returned {status} for {url}"
            ))),
        }
    }

    /// Fetch a contents-API path; the response is an array for directories
    /// and a single object for files.
    async fn contents(&self, repo: &RepoId, path: &str) -> Result<Vec<ContentItem>, HostError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.name, path
        );
        let body: serde_json::Value = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Api(format!("failed to parse contents response: {e}")))?;

        let items = if body.is_array() { body } else { serde_json::Value::Array(vec![body]) };
        serde_json::from_value(items)
            .map_err(|e| HostError::Api(format!("unexpected contents payload: {e}")))
    }

    /// Download raw bytes from an absolute URL (contents `download_url`).
    async fn download(&self, url: &str) -> Result<Vec<u8>, HostError> {
        let response = self.get(url).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| HostError::Api(format!("download from {url} failed: {e}")))
    }
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn get_repo(&self, repo: &RepoId) -> Result<(), HostError> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        self.get(&url).await?;
        debug!(owner = %repo.owner, repo = %repo.name, "resolved repository");
        Ok(())
    }

    async fn list_dir(&self, repo: &RepoId, path: &str) -> Result<Vec<RepoEntry>, HostError> {
        let items = self.contents(repo, path).await?;
        Ok(items
            .into_iter()
            .map(|item| RepoEntry {
                kind: match item.kind.as_str() {
                    "file" => EntryKind::File,
                    "dir" => EntryKind::Dir,
                    _ => EntryKind::Other,
                },
                path: item.path,
            })
            .collect())
    }

    async fn file_content(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>, HostError> {
        let mut items = self.contents(repo, path).await?;
        let item = items
            .pop()
            .ok_or_else(|| HostError::Api(format!("empty contents response for {path}")))?;

        match (item.encoding.as_deref(), item.content) {
            (Some("base64"), Some(encoded)) => {
                let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| HostError::Api(format!("invalid base64 content for {path}: {e}")))
            }
            // Files above the inline-content size limit come back with
            // `encoding: "none"`; fall back to the raw download URL.
            (_, _) => match item.download_url {
                Some(url) => self.download(&url).await,
                None => Err(HostError::Api(format!(
                    "no content or download URL for {path}"
                ))),
            },
        }
    }
}
