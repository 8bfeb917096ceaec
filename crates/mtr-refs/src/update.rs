//! The old/new/ref triple describing a single ref change.

use std::cell::OnceCell;

use mtr_types::CommitId;

use crate::error::Result;
use crate::names::branch_name;
use crate::traits::RepositoryQuery;

/// One ref moving from `old` to `new`.
///
/// A null commit id on the old side means the ref is being created; on the
/// new side, that it is being deleted. Pre-receive hooks see one of these per
/// ref a write touches.
#[derive(Clone, Debug)]
pub struct RefUpdate {
    pub ref_name: String,
    pub old: CommitId,
    pub new: CommitId,
    branch_name: OnceCell<Option<String>>,
}

impl RefUpdate {
    /// An update of `ref_name` from `old` to `new`.
    pub fn new(ref_name: impl Into<String>, old: CommitId, new: CommitId) -> Self {
        Self {
            ref_name: ref_name.into(),
            old,
            new,
            branch_name: OnceCell::new(),
        }
    }

    /// Short branch name, or `None` when the ref is not under `refs/heads/`.
    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name
            .get_or_init(|| branch_name(&self.ref_name).map(str::to_string))
            .as_deref()
    }

    /// True when the ref is a branch.
    pub fn is_branch_push(&self) -> bool {
        self.branch_name().is_some()
    }

    /// True when the ref did not exist before.
    pub fn branch_added(&self) -> bool {
        self.old.is_null()
    }

    /// True when the ref is being deleted.
    pub fn branch_removed(&self) -> bool {
        self.new.is_null()
    }

    /// An update that drops commits: the old tip is not reachable from the new.
    pub fn is_force_push(&self, repository: &dyn RepositoryQuery) -> Result<bool> {
        if self.branch_added() || self.branch_removed() {
            return Ok(false);
        }
        Ok(!repository.is_ancestor(&self.old, &self.new)?)
    }
}

impl PartialEq for RefUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.ref_name == other.ref_name && self.old == other.old && self.new == other.new
    }
}

impl Eq for RefUpdate {}
