//! The reference model.
//!
//! A ref is a named pointer to a commit. Branches move, tags do not, and
//! internal refs live outside both namespaces so tooling that lists branches
//! or tags never sees them.

use serde::{Deserialize, Serialize};
use mtr_types::CommitId;

use crate::names::{BRANCH_PREFIX, TAG_PREFIX};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// A mutable pointer to a branch tip.
    Branch {
        /// Short branch name (e.g. "main", "feature/auth").
        name: String,
        target: CommitId,
    },

    /// An immutable, annotated pointer to a commit.
    Tag {
        name: String,
        target: CommitId,
        message: String,
    },

    /// A ref outside `refs/heads/` and `refs/tags/`, addressed by full path.
    ///
    /// Merge-to-ref results live here. Writers overwrite them freely.
    Internal { path: String, target: CommitId },
}

impl Ref {
    /// Returns the canonical path for this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("{BRANCH_PREFIX}{name}"),
            Ref::Tag { name, .. } => format!("{TAG_PREFIX}{name}"),
            Ref::Internal { path, .. } => path.clone(),
        }
    }

    /// The commit this ref points to.
    pub fn target(&self) -> CommitId {
        match self {
            Ref::Branch { target, .. } | Ref::Tag { target, .. } | Ref::Internal { target, .. } => {
                *target
            }
        }
    }

    /// True for refs under `refs/heads/`.
    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    /// True for refs under `refs/tags/`.
    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    /// True for refs outside heads and tags, merge refs included.
    pub fn is_internal(&self) -> bool {
        matches!(self, Ref::Internal { .. })
    }
}
