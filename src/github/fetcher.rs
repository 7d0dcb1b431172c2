//! Repository traversal: directory tree → flat [`FileSet`].

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::FileSet;

use super::{EntryKind, HostError, RepoHost, RepoId};

/// Errors from fetching a repository.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("repository not found")]
    RepositoryNotFound,

    #[error("failed to fetch repository: {0}")]
    Host(String),
}

/// Fetch every decodable text file of a repository.
///
/// Resolves the repository first (`NotFound` becomes
/// [`FetchError::RepositoryNotFound`], anything else [`FetchError::Host`]),
/// then walks the tree with an explicit work queue rather than recursion, so
/// stack depth stays constant regardless of how deep the tree nests.
/// Directory entries enqueue their own listing; file entries are fetched and
/// decoded as UTF-8, and files that fail to decode are skipped, never fatal.
///
/// The returned set preserves discovery order. An empty repository yields an
/// empty set; classifying that as an error is the orchestrator's call.
pub async fn fetch_repository(host: &dyn RepoHost, repo: &RepoId) -> Result<FileSet, FetchError> {
    match host.get_repo(repo).await {
        Ok(()) => {}
        Err(HostError::NotFound) => return Err(FetchError::RepositoryNotFound),
        Err(HostError::Api(msg)) => return Err(FetchError::Host(msg)),
    }

    let mut files = FileSet::new();
    let mut queue: VecDeque<String> = VecDeque::from([String::new()]);

    while let Some(dir) = queue.pop_front() {
        let entries = match host.list_dir(repo, &dir).await {
            Ok(entries) => entries,
            // A directory that vanished mid-walk (force-push race); on the
            // root listing this is an empty repository. Either way, nothing
            // to traverse here.
            Err(HostError::NotFound) => {
                debug!(%repo, %dir, "directory listing not found, skipping");
                continue;
            }
            Err(HostError::Api(msg)) => return Err(FetchError::Host(msg)),
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Dir => queue.push_back(entry.path),
                EntryKind::File => {
                    let bytes = match host.file_content(repo, &entry.path).await {
                        Ok(bytes) => bytes,
                        Err(HostError::NotFound) => {
                            debug!(%repo, path = %entry.path, "file vanished mid-walk, skipping");
                            continue;
                        }
                        Err(HostError::Api(msg)) => return Err(FetchError::Host(msg)),
                    };

                    match String::from_utf8(bytes) {
                        Ok(text) => {
                            debug!(%repo, path = %entry.path, "fetched file");
                            files.insert(entry.path, text);
                        }
                        Err(_) => {
                            warn!(%repo, path = %entry.path, "skipping non-text file");
                        }
                    }
                }
                EntryKind::Other => {
                    debug!(%repo, path = %entry.path, "skipping non-file entry");
                }
            }
        }
    }

    info!(%repo, files = files.len(), "repository fetch complete");
    Ok(files)
}
