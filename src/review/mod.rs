//! Review orchestration: cache lookup → fetch → prompt → generate → parse.

pub mod parser;
pub mod prompt;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{cache_key, CacheEngine};
use crate::github::{fetch_repository, FetchError, RepoHost, RepoId};
use crate::models::{ReviewRequest, ReviewSummary};
use crate::providers::ReviewProvider;

/// Errors from the review pipeline, each mapped to a distinct HTTP status
/// by the server layer.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The locator does not name an owner/repo path. Detected before any
    /// I/O, so it is a validation failure rather than a fetch failure.
    #[error("invalid repository locator: {0}")]
    InvalidLocator(String),

    #[error("repository not found")]
    RepoNotFound,

    #[error("failed to fetch repository: {0}")]
    Fetch(String),

    #[error("no reviewable files found in the repository")]
    NoFilesFound,

    #[error("review generation failed: {0}")]
    Generation(String),
}

impl From<FetchError> for ReviewError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RepositoryNotFound => ReviewError::RepoNotFound,
            FetchError::Host(msg) => ReviewError::Fetch(msg),
        }
    }
}

/// Result of a completed review.
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Fetched file paths in traversal order.
    pub files_found: Vec<String>,
    pub summary: ReviewSummary,
}

/// Sequences one review end-to-end.
///
/// Collaborators are injected once at startup; the service itself holds no
/// mutable state, so one instance serves all concurrent requests.
pub struct ReviewService {
    host: Arc<dyn RepoHost>,
    provider: Arc<dyn ReviewProvider>,
    cache: Arc<CacheEngine>,
}

impl ReviewService {
    pub fn new(
        host: Arc<dyn RepoHost>,
        provider: Arc<dyn ReviewProvider>,
        cache: Arc<CacheEngine>,
    ) -> Self {
        Self {
            host,
            provider,
            cache,
        }
    }

    /// Run the pipeline for one request.
    ///
    /// The cache is consulted before the hosting provider and written only
    /// after a successful, non-empty fetch — never on a hit, never before
    /// the fetch completes. Generation failures surface as errors; parse
    /// failures do not (the parser degrades instead).
    pub async fn review(&self, request: &ReviewRequest) -> Result<ReviewOutcome, ReviewError> {
        let repo = RepoId::parse(&request.github_repo_url).map_err(ReviewError::InvalidLocator)?;
        let level = request.candidate_level;
        let key = cache_key(&repo, level);

        let files = match self.cache.get(&key) {
            Some(files) => {
                info!(%repo, %level, files = files.len(), "using cached repository content");
                files
            }
            None => {
                debug!(%repo, %level, "cache miss, fetching repository");
                let files = fetch_repository(self.host.as_ref(), &repo).await?;
                // An empty fetch maps to a terminal failure below; caching
                // it would pin that failure until the entry expires.
                if !files.is_empty() {
                    self.cache.put(&key, &files);
                }
                files
            }
        };

        if files.is_empty() {
            return Err(ReviewError::NoFilesFound);
        }

        let prompt =
            prompt::build_review_prompt(&files, &request.assignment_description, level);
        let raw = self
            .provider
            .generate(&prompt)
            .await
            .map_err(|e| ReviewError::Generation(e.to_string()))?;

        let summary = parser::parse_review(&raw);
        info!(%repo, %level, files = files.len(), "review complete");

        Ok(ReviewOutcome {
            files_found: files.paths(),
            summary,
        })
    }
}
