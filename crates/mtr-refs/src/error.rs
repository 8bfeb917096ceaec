//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference was not found.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// The ref name or path breaks the naming rules.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A tag is immutable and cannot be updated.
    #[error("tag is immutable: {name}")]
    TagImmutable { name: String },

    /// The path a ref is stored under disagrees with the ref's own name.
    #[error("ref stored at {path} but names itself {canonical}")]
    PathMismatch { path: String, canonical: String },

    /// The change request's source revision does not resolve to a commit.
    #[error("no source for merge: {revision}")]
    NoSource { revision: String },

    /// A lock guarding ref state was poisoned by a panicking writer.
    #[error("ref store lock poisoned: {0}")]
    LockPoisoned(String),

    /// Backend-specific failure reported by a repository implementation.
    #[error("repository error: {0}")]
    Backend(String),
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
