//! Foundation types for the merge-to-ref workspace.
//!
//! Every other `mtr-*` crate depends on `mtr-types`. Nothing here performs
//! I/O: these are the plain values passed between the resolver, the gate,
//! the executor and the caller.
//!
//! # Key Types
//!
//! - [`CommitId`]: Content-addressed commit identifier (BLAKE3 hash)
//! - [`ActorId`] / [`ActorContext`]: Who performs an operation
//! - [`ChangeRequest`]: A proposed integration of a source into a target branch
//! - [`MergeStrategy`]: How source history is combined with target history

pub mod change;
pub mod error;
pub mod identity;
pub mod object;
pub mod strategy;

pub use change::{ChangeRequest, ChangeRequestId, ChangeRequestState, SourceRevision};
pub use error::TypeError;
pub use identity::{ActorContext, ActorId};
pub use object::CommitId;
pub use strategy::MergeStrategy;
