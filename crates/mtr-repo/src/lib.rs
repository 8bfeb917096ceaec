//! Repository backend for merge-to-ref.
//!
//! The merge-to-ref core treats version-control storage as a black box with
//! two faces: read-only lookups ([`mtr_refs::RepositoryQuery`]) and a merge
//! primitive that computes a merge and force-writes it to a ref
//! ([`MergePrimitive`]). This crate defines the merge primitive contract and
//! ships [`InMemoryRepository`], a small commit graph that implements both so
//! the core can run end to end without a real VCS.

pub mod error;
pub mod hooks;
pub mod memory;
pub mod merge;
pub mod object;
pub mod traits;

pub use error::{RepoError, RepoResult};
pub use hooks::{HookChain, HookResult, PreReceiveHook};
pub use memory::InMemoryRepository;
pub use merge::{three_way_merge, TreeMerge};
pub use object::{Commit, Tree};
pub use traits::{MergeDescriptor, MergePrimitive};
