use mtr_gate::{GateError, Rejection};
use mtr_refs::RefError;
use thiserror::Error;

use crate::outcome::FailureKind;

/// Everything that can end a merge-to-ref call without a commit.
///
/// The `Display` form is the message reported in
/// [`MergeOutcome::Failure`](crate::MergeOutcome::Failure).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MergeToRefError {
    /// The validation pipeline refused the request.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The merge primitive could not combine source and target.
    #[error("Conflicts detected during merge")]
    Conflict,

    /// The merge primitive failed or a pre-receive hook refused the ref
    /// update. Carries the upstream message unchanged.
    #[error("{0}")]
    MergeExecution(String),

    /// A read-only repository query failed.
    #[error("{0}")]
    Repository(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// The request belongs to a project this service does not write for.
    #[error("Merge request {request} does not belong to project {project}")]
    ForeignProject { request: String, project: String },
}

impl MergeToRefError {
    /// The reporting category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Rejected(rejection) => FailureKind::from(rejection),
            Self::Conflict => FailureKind::Conflict,
            Self::MergeExecution(_) => FailureKind::MergeExecution,
            Self::Repository(_) => FailureKind::Repository,
            Self::Config(_) => FailureKind::Config,
            Self::ForeignProject { .. } => FailureKind::ForeignProject,
        }
    }
}

impl From<RefError> for MergeToRefError {
    fn from(err: RefError) -> Self {
        match err {
            RefError::NoSource { .. } => Self::Rejected(Rejection::NoSource),
            other => Self::Repository(other.to_string()),
        }
    }
}

impl From<GateError> for MergeToRefError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Repository(ref_error) => Self::from(ref_error),
            GateError::Config(message) => Self::Config(message),
            stage @ GateError::StageError { .. } => Self::MergeExecution(stage.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeToRefError>;
