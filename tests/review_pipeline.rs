//! Integration tests for the review pipeline.
//!
//! Validates the orchestrator end-to-end without network access by using
//! mock implementations of the RepoHost and ReviewProvider capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use critiq::cache::CacheEngine;
use critiq::github::{EntryKind, HostError, RepoEntry, RepoHost, RepoId};
use critiq::models::{CandidateLevel, Comments, ReviewRequest};
use critiq::providers::{ProviderError, ReviewProvider};
use critiq::review::{ReviewError, ReviewService};

/// In-memory repository host that counts traversal calls.
struct MockHost {
    exists: bool,
    dirs: HashMap<String, Vec<RepoEntry>>,
    files: HashMap<String, Vec<u8>>,
    fetch_sequences: AtomicUsize,
}

impl MockHost {
    /// A two-level repository: root with a file and a `src` directory.
    fn with_sample_repo() -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(
            String::new(),
            vec![
                entry("README.md", EntryKind::File),
                entry("src", EntryKind::Dir),
            ],
        );
        dirs.insert(
            "src".to_string(),
            vec![entry("src/main.py", EntryKind::File)],
        );

        let mut files = HashMap::new();
        files.insert("README.md".to_string(), b"# assignment".to_vec());
        files.insert("src/main.py".to_string(), b"print('hi')".to_vec());

        Self {
            exists: true,
            dirs,
            files,
            fetch_sequences: AtomicUsize::new(0),
        }
    }

    fn empty_repo() -> Self {
        Self {
            exists: true,
            dirs: HashMap::new(),
            files: HashMap::new(),
            fetch_sequences: AtomicUsize::new(0),
        }
    }

    fn missing_repo() -> Self {
        Self {
            exists: false,
            dirs: HashMap::new(),
            files: HashMap::new(),
            fetch_sequences: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetch_sequences.load(Ordering::SeqCst)
    }
}

fn entry(path: &str, kind: EntryKind) -> RepoEntry {
    RepoEntry {
        path: path.to_string(),
        kind,
    }
}

#[async_trait]
impl RepoHost for MockHost {
    async fn get_repo(&self, _repo: &RepoId) -> Result<(), HostError> {
        // One resolve call marks the start of one fetch sequence.
        self.fetch_sequences.fetch_add(1, Ordering::SeqCst);
        if self.exists {
            Ok(())
        } else {
            Err(HostError::NotFound)
        }
    }

    async fn list_dir(&self, _repo: &RepoId, path: &str) -> Result<Vec<RepoEntry>, HostError> {
        self.dirs.get(path).cloned().ok_or(HostError::NotFound)
    }

    async fn file_content(&self, _repo: &RepoId, path: &str) -> Result<Vec<u8>, HostError> {
        self.files.get(path).cloned().ok_or(HostError::NotFound)
    }
}

/// Provider returning canned text, recording every prompt it receives.
struct MockProvider {
    response: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    fn with_response(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response
            .clone()
            .map_err(ProviderError::ApiError)
    }
}

const STRUCTURED_RESPONSE: &str = r#"{
    "Downsides/Comments": ["No tests.", "Hardcoded configuration."],
    "Rating": "6/10",
    "Conclusion": "Reasonable Junior submission."
}"#;

fn request(description: &str, url: &str, level: CandidateLevel) -> ReviewRequest {
    ReviewRequest {
        assignment_description: description.to_string(),
        github_repo_url: url.to_string(),
        candidate_level: level,
    }
}

fn cache_in(dir: &tempfile::TempDir) -> Arc<CacheEngine> {
    Arc::new(CacheEngine::new(
        true,
        Some(dir.path().to_path_buf()),
        Duration::from_secs(60),
    ))
}

fn service(
    host: Arc<MockHost>,
    provider: Arc<MockProvider>,
    cache: Arc<CacheEngine>,
) -> ReviewService {
    ReviewService::new(host, provider, cache)
}

#[tokio::test]
async fn pipeline_returns_files_in_traversal_order_and_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), Arc::clone(&provider), cache_in(&dir));

    let outcome = svc
        .review(&request(
            "Build a CLI",
            "https://github.com/alice/todo",
            CandidateLevel::Junior,
        ))
        .await
        .expect("review should succeed");

    assert_eq!(outcome.files_found, vec!["README.md", "src/main.py"]);
    assert_eq!(
        outcome.summary.comments,
        Comments::List(vec!["No tests.".into(), "Hardcoded configuration.".into()])
    );
    assert_eq!(outcome.summary.rating, "6/10");
    assert!(!outcome.summary.conclusion.is_empty());
}

#[tokio::test]
async fn prompt_contains_files_description_and_level() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(host, Arc::clone(&provider), cache_in(&dir));

    svc.review(&request(
        "Build a CLI tool",
        "alice/todo",
        CandidateLevel::Senior,
    ))
    .await
    .unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("'Senior' level candidate"));
    assert!(prompt.contains("File: README.md"));
    assert!(prompt.contains("File: src/main.py"));
    assert!(prompt.contains("print('hi')"));
    assert!(prompt.contains("Assignment: Build a CLI tool"));
}

#[tokio::test]
async fn second_identical_request_reuses_cached_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), provider, cache_in(&dir));

    let req = request(
        "Build a CLI",
        "https://github.com/alice/todo",
        CandidateLevel::Junior,
    );

    let first = svc.review(&req).await.unwrap();
    let second = svc.review(&req).await.unwrap();

    // Exactly one host fetch sequence across both requests.
    assert_eq!(host.fetches(), 1);
    assert_eq!(first.files_found, second.files_found);
}

#[tokio::test]
async fn cache_key_ignores_assignment_description() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), provider, cache_in(&dir));

    svc.review(&request("First assignment", "alice/todo", CandidateLevel::Junior))
        .await
        .unwrap();
    svc.review(&request(
        "Completely different assignment",
        "alice/todo",
        CandidateLevel::Junior,
    ))
    .await
    .unwrap();

    assert_eq!(host.fetches(), 1, "second request should hit the cache");
}

#[tokio::test]
async fn different_level_fetches_again() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), provider, cache_in(&dir));

    let req_junior = request("Task", "alice/todo", CandidateLevel::Junior);
    svc.review(&req_junior).await.unwrap();
    svc.review(&request("Task", "alice/todo", CandidateLevel::Senior))
        .await
        .unwrap();

    assert_eq!(host.fetches(), 2, "levels must not share cache entries");
}

#[tokio::test]
async fn missing_repository_is_repo_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::missing_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(host, Arc::clone(&provider), cache_in(&dir));

    let err = svc
        .review(&request("Task", "alice/missing", CandidateLevel::Middle))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::RepoNotFound));
    // The provider is never consulted for an unresolvable repository.
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn empty_repository_is_no_files_found() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::empty_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), Arc::clone(&provider), cache_in(&dir));

    let err = svc
        .review(&request("Task", "alice/empty", CandidateLevel::Middle))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::NoFilesFound));
    assert!(provider.prompts().is_empty());

    // The empty result is not cached: a retry fetches again.
    let err = svc
        .review(&request("Task", "alice/empty", CandidateLevel::Middle))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::NoFilesFound));
    assert_eq!(host.fetches(), 2);
}

#[tokio::test]
async fn generation_failure_surfaces_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::failing("quota exhausted"));
    let svc = service(host, provider, cache_in(&dir));

    let err = svc
        .review(&request("Task", "alice/todo", CandidateLevel::Junior))
        .await
        .unwrap_err();

    match err {
        ReviewError::Generation(msg) => assert!(msg.contains("quota exhausted")),
        other => panic!("expected Generation error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_locator_fails_before_any_host_call() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let svc = service(Arc::clone(&host), provider, cache_in(&dir));

    let err = svc
        .review(&request("Task", "notaurl", CandidateLevel::Junior))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::InvalidLocator(_)));
    assert_eq!(host.fetches(), 0);
}

#[tokio::test]
async fn unstructured_model_output_degrades_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(
        "Honestly the code looks fine to me.",
    ));
    let svc = service(host, provider, cache_in(&dir));

    let outcome = svc
        .review(&request("Task", "alice/todo", CandidateLevel::Junior))
        .await
        .expect("malformed model output must not fail the request");

    assert_eq!(
        outcome.summary.comments,
        Comments::Text("Honestly the code looks fine to me.".into())
    );
    assert_eq!(outcome.summary.rating, "N/A");
    assert!(!outcome.summary.conclusion.is_empty());
}

#[tokio::test]
async fn fenced_model_output_parses_like_unfenced() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let fenced = format!("```json\n{STRUCTURED_RESPONSE}\n```");
    let provider = Arc::new(MockProvider::with_response(&fenced));
    let svc = service(host, provider, cache_in(&dir));

    let outcome = svc
        .review(&request("Task", "alice/todo", CandidateLevel::Junior))
        .await
        .unwrap();

    assert_eq!(outcome.summary.rating, "6/10");
    assert_eq!(
        outcome.summary.comments,
        Comments::List(vec!["No tests.".into(), "Hardcoded configuration.".into()])
    );
}

#[tokio::test]
async fn disabled_cache_fetches_every_time() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(MockHost::with_sample_repo());
    let provider = Arc::new(MockProvider::with_response(STRUCTURED_RESPONSE));
    let cache = Arc::new(CacheEngine::new(
        false,
        Some(dir.path().to_path_buf()),
        Duration::from_secs(60),
    ));
    let svc = service(Arc::clone(&host), provider, cache);

    let req = request("Task", "alice/todo", CandidateLevel::Junior);
    svc.review(&req).await.unwrap();
    svc.review(&req).await.unwrap();

    assert_eq!(host.fetches(), 2);
}
