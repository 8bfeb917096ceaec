use mtr_types::MergeStrategy;
use thiserror::Error;

/// Why the pipeline refused to let a merge-to-ref proceed.
///
/// The `Display` form of each variant is the exact message reported to the
/// caller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You are not allowed to merge to this ref")]
    NotAllowed,

    #[error("Feature is not enabled")]
    FeatureDisabled { flag: String },

    #[error("{human} to {merge_ref} is currently not supported.", human = .strategy.human_name())]
    UnsupportedMethod {
        strategy: MergeStrategy,
        project: String,
        merge_ref: String,
    },

    /// An integration hook's own message, unmodified.
    #[error("{message}")]
    HookValidation { message: String },

    #[error("Fast-forward merge is not possible. Please update your source branch.")]
    NeedsRebase,

    #[error("Merge request is not mergeable to {merge_ref}")]
    NotMergeableToRef { merge_ref: String },

    #[error("No source for merge")]
    NoSource,
}

/// Errors that stop the pipeline without producing a verdict.
#[derive(Debug, Error)]
pub enum GateError {
    /// A repository lookup failed while a stage was deciding.
    #[error("repository error: {0}")]
    Repository(#[from] mtr_refs::RefError),

    /// A stage returned an unexpected error.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Shorthand for [`GateError::StageError`].
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
