//! Ordered path → content mapping produced by one repository fetch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Decoded text files of a repository, keyed by relative path.
///
/// Insertion order equals traversal/discovery order, which is also the
/// order the prompt builder renders files in and the order of
/// `files_found` in the response. Built once by the fetcher (or restored
/// verbatim from the cache) and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet(IndexMap<String, String>);

impl FileSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a decoded file. Re-inserting a path keeps its original position.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.0.insert(path.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(path, content)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// File paths in insertion order.
    pub fn paths(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for FileSet {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        )
    }
}
