//! Repository hosting provider integration.
//!
//! The [`RepoHost`] trait is the capability boundary: resolve a repository,
//! list a directory, fetch a file's raw bytes. The production implementation
//! is [`client::GithubClient`]; tests substitute mock hosts.

pub mod client;
pub mod fetcher;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GithubClient;
pub use fetcher::{fetch_repository, FetchError};

/// Errors from the hosting provider.
#[derive(Error, Debug)]
pub enum HostError {
    /// The provider reports the resource as absent.
    #[error("not found")]
    NotFound,

    /// Any other provider failure (network, auth, quota, protocol).
    #[error("{0}")]
    Api(String),
}

/// Owner/name identifier of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Parse a repository locator into owner/name.
    ///
    /// Accepts:
    /// - `https://github.com/owner/repo` (optionally with `.git` or extra path)
    /// - `git@github.com:owner/repo.git`
    /// - `owner/repo` shorthand
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim().trim_end_matches('/');

        let path = if let Some(rest) = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
        {
            // Drop the host; keep the path.
            rest.split_once('/')
                .map(|(_, path)| path)
                .ok_or_else(|| format!("missing repository path in '{input}'"))?
        } else if let Some(rest) = trimmed.strip_prefix("git@") {
            rest.split_once(':')
                .map(|(_, path)| path)
                .ok_or_else(|| format!("missing repository path in '{input}'"))?
        } else {
            trimmed
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments
            .next()
            .ok_or_else(|| format!("locator '{input}' has no owner segment"))?;
        let name = segments
            .next()
            .ok_or_else(|| format!("locator '{input}' has no repository segment"))?;
        let name = name.trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() {
            return Err(format!("locator '{input}' does not name an owner/repo"));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// The `owner/name` form used in API paths and cache keys.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of a directory entry as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the traversal skips.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Path relative to the repository root.
    pub path: String,
    pub kind: EntryKind,
}

/// Capability surface of the repository hosting provider.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Resolve the repository; `NotFound` if it does not exist or is private
    /// to the configured token.
    async fn get_repo(&self, repo: &RepoId) -> Result<(), HostError>;

    /// List the entries of a directory (`""` for the repository root).
    async fn list_dir(&self, repo: &RepoId, path: &str) -> Result<Vec<RepoEntry>, HostError>;

    /// Fetch a file's content as raw bytes.
    async fn file_content(&self, repo: &RepoId, path: &str) -> Result<Vec<u8>, HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_url() {
        let repo = RepoId::parse("https://github.com/alice/todo").unwrap();
        assert_eq!(repo.owner, "alice");
        assert_eq!(repo.name, "todo");
    }

    #[test]
    fn parse_https_url_with_git_suffix_and_trailing_slash() {
        let repo = RepoId::parse("https://github.com/alice/todo.git/").unwrap();
        assert_eq!(repo.full_name(), "alice/todo");
    }

    #[test]
    fn parse_ssh_url() {
        let repo = RepoId::parse("git@github.com:alice/todo.git").unwrap();
        assert_eq!(repo.full_name(), "alice/todo");
    }

    #[test]
    fn parse_shorthand() {
        let repo = RepoId::parse("alice/todo").unwrap();
        assert_eq!(repo.full_name(), "alice/todo");
    }

    #[test]
    fn parse_ignores_extra_path_segments() {
        let repo = RepoId::parse("https://github.com/alice/todo/tree/main/src").unwrap();
        assert_eq!(repo.full_name(), "alice/todo");
    }

    #[test]
    fn parse_rejects_locator_without_repo() {
        assert!(RepoId::parse("https://github.com/alice").is_err());
        assert!(RepoId::parse("justoneword").is_err());
        assert!(RepoId::parse("").is_err());
    }

    #[test]
    fn display_matches_full_name() {
        let repo = RepoId::parse("alice/todo").unwrap();
        assert_eq!(repo.to_string(), "alice/todo");
    }
}
