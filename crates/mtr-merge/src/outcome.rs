//! Result reporting: terminal states and the caller-facing outcome.

use std::fmt;

use mtr_gate::Rejection;
use mtr_types::CommitId;
use serde::{Deserialize, Serialize};

use crate::error::MergeToRefError;

// ---------------------------------------------------------------------------
// MergeState
// ---------------------------------------------------------------------------

/// Where a single merge-to-ref call is. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeState {
    Start,
    Validating,
    Rejected,
    Merging,
    Succeeded,
    Conflicted,
    Failed,
}

impl MergeState {
    /// True for states a call ends in.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Succeeded | Self::Conflicted | Self::Failed
        )
    }

    /// The terminal state a finished call ended in.
    pub fn terminal(result: &Result<CommitId, MergeToRefError>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(MergeToRefError::Rejected(_)) => Self::Rejected,
            Err(MergeToRefError::Conflict) => Self::Conflicted,
            Err(_) => Self::Failed,
        }
    }

    /// Lowercase name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Merging => "merging",
            Self::Succeeded => "succeeded",
            Self::Conflicted => "conflicted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Which failure produced a [`MergeOutcome::Failure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotAllowed,
    FeatureDisabled,
    UnsupportedMethod,
    HookValidation,
    NeedsRebase,
    NotMergeableToRef,
    NoSource,
    Conflict,
    MergeExecution,
    Repository,
    Config,
    ForeignProject,
}

impl From<&Rejection> for FailureKind {
    fn from(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::NotAllowed => Self::NotAllowed,
            Rejection::FeatureDisabled { .. } => Self::FeatureDisabled,
            Rejection::UnsupportedMethod { .. } => Self::UnsupportedMethod,
            Rejection::HookValidation { .. } => Self::HookValidation,
            Rejection::NeedsRebase => Self::NeedsRebase,
            Rejection::NotMergeableToRef { .. } => Self::NotMergeableToRef,
            Rejection::NoSource => Self::NoSource,
        }
    }
}

// ---------------------------------------------------------------------------
// MergeOutcome
// ---------------------------------------------------------------------------

/// What a merge-to-ref call reports back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    Success { commit_id: CommitId },
    Failure { message: String, kind: FailureKind },
}

impl MergeOutcome {
    /// Map a finished call to its outcome. Failure messages are the error's
    /// own message, unmodified.
    pub fn report(result: Result<CommitId, MergeToRefError>) -> Self {
        match result {
            Ok(commit_id) => Self::Success { commit_id },
            Err(err) => Self::failure(&err),
        }
    }

    /// The failure outcome for `err`, with its message unmodified.
    pub fn failure(err: &MergeToRefError) -> Self {
        Self::Failure {
            message: err.to_string(),
            kind: err.kind(),
        }
    }

    /// True for [`MergeOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The merge commit, on success.
    pub fn commit_id(&self) -> Option<CommitId> {
        match self {
            Self::Success { commit_id } => Some(*commit_id),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, on failure.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    /// The failure category, on failure.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        let ok: Result<CommitId, MergeToRefError> = Ok(CommitId::null());
        assert_eq!(MergeState::terminal(&ok), MergeState::Succeeded);
        assert_eq!(
            MergeState::terminal(&Err(Rejection::NotAllowed.into())),
            MergeState::Rejected
        );
        assert_eq!(
            MergeState::terminal(&Err(MergeToRefError::Conflict)),
            MergeState::Conflicted
        );
        assert_eq!(
            MergeState::terminal(&Err(MergeToRefError::MergeExecution("x".into()))),
            MergeState::Failed
        );
        assert!(!MergeState::Merging.is_terminal());
        assert!(MergeState::Conflicted.is_terminal());
    }

    #[test]
    fn report_keeps_upstream_message() {
        let outcome = MergeOutcome::report(Err(MergeToRefError::Conflict));
        assert_eq!(outcome.message(), Some("Conflicts detected during merge"));
        assert_eq!(outcome.kind(), Some(FailureKind::Conflict));
        assert_eq!(outcome.commit_id(), None);
    }

    #[test]
    fn outcome_json_shape() {
        let outcome = MergeOutcome::report(Err(Rejection::NoSource.into()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "no_source");
        assert_eq!(json["message"], "No source for merge");
    }
}
