//! Commits and trees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use mtr_types::CommitId;

use crate::error::{RepoError, RepoResult};

/// Domain tag mixed into every commit hash.
const COMMIT_DOMAIN: &str = "mtr-commit-v1";

/// A snapshot of file contents keyed by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    entries: BTreeMap<String, String>,
}

impl Tree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents stored at `path`.
    pub fn get(&self, path: &str) -> Option<&String> {
        self.entries.get(path)
    }

    /// Store `contents` at `path`, replacing any previous contents.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.entries.insert(path.into(), contents.into());
    }

    /// Remove `path`, returning its contents.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    /// All paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the tree has no paths.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for Tree {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

/// An immutable commit. Its id is the hash of its contents, so there are no
/// timestamps: the same parents, tree, author and message always yield the
/// same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub parents: Vec<CommitId>,
    pub tree: Tree,
    pub author: String,
    pub message: String,
}

impl Commit {
    /// The content hash identifying this commit.
    pub fn id(&self) -> RepoResult<CommitId> {
        let payload =
            serde_json::to_vec(self).map_err(|e| RepoError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(COMMIT_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(&payload);
        Ok(CommitId::from_hash(*hasher.finalize().as_bytes()))
    }

    /// True for a commit without parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
