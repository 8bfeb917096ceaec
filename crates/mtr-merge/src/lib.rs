//! Merge-to-ref: a dry-run merge of a change request.
//!
//! [`MergeToRefService::execute_merge_to_ref`] resolves a change request's
//! source and target, runs the validation pipeline from [`mtr_gate`], asks
//! the repository's [`mtr_repo::MergePrimitive`] for the merge and force-writes
//! the result to `refs/<namespace>/<iid>/merge`. The target branch is never
//! touched. The result is reported as a [`MergeOutcome`].
//!
//! ```text
//! Start -> Validating -> Rejected
//!                     -> Merging -> Succeeded | Conflicted | Failed
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod message;
pub mod outcome;
pub mod service;

pub use config::MergeToRefConfig;
pub use error::{MergeToRefError, Result};
pub use executor::MergeExecutor;
pub use message::{commit_message, render, DEFAULT_COMMIT_MESSAGE_TEMPLATE};
pub use outcome::{FailureKind, MergeOutcome, MergeState};
pub use service::MergeToRefService;
