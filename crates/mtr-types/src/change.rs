use std::fmt;

use serde::{Deserialize, Serialize};

use crate::object::CommitId;
use crate::strategy::MergeStrategy;

/// Identity of a change request: the owning project plus a per-project number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChangeRequestId {
    /// Full path of the owning project (e.g. "group/app").
    pub project: String,
    /// Per-project sequence number.
    pub iid: u64,
}

impl ChangeRequestId {
    /// The request numbered `iid` in `project`.
    pub fn new(project: impl Into<String>, iid: u64) -> Self {
        Self {
            project: project.into(),
            iid,
        }
    }
}

impl fmt::Display for ChangeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.project, self.iid)
    }
}

/// Where the source side of a change request points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRevision {
    /// Tip of a named branch, resolved at merge time.
    Branch(String),
    /// An explicit commit.
    Commit(CommitId),
}

impl SourceRevision {
    /// The revision string handed to the repository for resolution.
    pub fn revision(&self) -> String {
        match self {
            SourceRevision::Branch(name) => name.clone(),
            SourceRevision::Commit(id) => id.to_hex(),
        }
    }
}

impl fmt::Display for SourceRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRevision::Branch(name) => f.write_str(name),
            SourceRevision::Commit(id) => f.write_str(&id.short_hex()),
        }
    }
}

/// Lifecycle state of a change request, as tracked by the surrounding system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeRequestState {
    Open,
    Closed,
    Locked,
    Merged,
}

/// A proposed integration of a source revision into a target branch.
///
/// The merge-to-ref core treats this as read-only input. The synthetic ref it
/// writes to is derived from [`ChangeRequest::id`] by the reference resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: ChangeRequestId,
    pub title: String,
    pub source: SourceRevision,
    pub target_branch: String,
    pub strategy: MergeStrategy,
    /// Set by the surrounding system when it already knows a rebase is due.
    pub rebase_required: bool,
    pub state: ChangeRequestState,
    /// Source or target vanished underneath the request.
    pub broken: bool,
    /// Overrides the configured default merge commit message template.
    pub commit_message_template: Option<String>,
}

impl ChangeRequest {
    /// An open merge-commit request with no overrides.
    pub fn new(
        id: ChangeRequestId,
        title: impl Into<String>,
        source: SourceRevision,
        target_branch: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            source,
            target_branch: target_branch.into(),
            strategy: MergeStrategy::MergeCommit,
            rebase_required: false,
            state: ChangeRequestState::Open,
            broken: false,
            commit_message_template: None,
        }
    }

    /// Replace the merge strategy.
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Whether the request is in a state that allows materializing a merge ref.
    ///
    /// Repeating a merge-to-ref on an open request is fine; closed, locked,
    /// merged and broken requests are not eligible.
    pub fn mergeable_to_ref(&self) -> bool {
        self.state == ChangeRequestState::Open && !self.broken
    }

    /// Human readable source name used in commit messages.
    pub fn source_label(&self) -> String {
        self.source.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChangeRequest {
        ChangeRequest::new(
            ChangeRequestId::new("group/app", 7),
            "Add login",
            SourceRevision::Branch("feature/login".into()),
            "main",
        )
    }

    #[test]
    fn id_display_is_reference() {
        assert_eq!(ChangeRequestId::new("group/app", 7).to_string(), "group/app!7");
    }

    #[test]
    fn new_request_defaults() {
        let cr = request();
        assert_eq!(cr.strategy, MergeStrategy::MergeCommit);
        assert_eq!(cr.state, ChangeRequestState::Open);
        assert!(!cr.rebase_required);
        assert!(cr.commit_message_template.is_none());
    }

    #[test]
    fn only_open_intact_requests_are_mergeable_to_ref() {
        let mut cr = request();
        assert!(cr.mergeable_to_ref());

        for state in [
            ChangeRequestState::Closed,
            ChangeRequestState::Locked,
            ChangeRequestState::Merged,
        ] {
            cr.state = state;
            assert!(!cr.mergeable_to_ref(), "{state:?} must not be eligible");
        }

        cr.state = ChangeRequestState::Open;
        cr.broken = true;
        assert!(!cr.mergeable_to_ref());
    }

    #[test]
    fn source_revision_forms() {
        let id = CommitId::from_bytes(b"c1");
        let by_sha = SourceRevision::Commit(id);
        assert_eq!(by_sha.revision(), id.to_hex());
        assert_eq!(by_sha.to_string(), id.short_hex());

        let by_branch = SourceRevision::Branch("topic".into());
        assert_eq!(by_branch.revision(), "topic");
    }
}
