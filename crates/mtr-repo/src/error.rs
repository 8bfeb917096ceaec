use thiserror::Error;
use mtr_types::CommitId;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A pre-receive hook refused a ref update. Displays the hook's message
    /// verbatim.
    #[error("{message}")]
    PreReceive { message: String },

    #[error("unknown commit: {0}")]
    UnknownCommit(CommitId),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Merge results may only be written outside `refs/heads/` and `refs/tags/`.
    #[error("refusing to write merge result to {0}")]
    ProtectedRef(String),

    #[error("ref error: {0}")]
    Ref(#[from] mtr_refs::RefError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("repository lock poisoned: {0}")]
    LockPoisoned(String),
}

impl RepoError {
    /// A write refused by a pre-receive hook.
    pub fn pre_receive(message: impl Into<String>) -> Self {
        Self::PreReceive {
            message: message.into(),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
