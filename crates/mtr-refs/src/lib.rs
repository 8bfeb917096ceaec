//! Reference management for merge-to-ref.
//!
//! References are the named entry points into a repository's commit graph.
//! Besides ordinary branches and tags this crate knows about *internal*
//! refs: paths such as `refs/merge-requests/7/merge` that hold materialized
//! merge results without ever showing up as a branch or a tag.
//!
//! # Modules
//!
//! - [`error`]: Error types for ref operations
//! - [`types`]: The [`Ref`] model
//! - [`names`]: Name validation and merge-ref path derivation
//! - [`traits`]: [`RefStore`] (storage) and [`RepositoryQuery`] (read-only lookups)
//! - [`memory`]: In-memory [`InMemoryRefStore`]
//! - [`update`]: [`RefUpdate`], the old/new/ref triple a push produces
//! - [`resolver`]: [`ReferenceResolver`], turning a change request into commits

pub mod error;
pub mod memory;
pub mod names;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod update;

pub use error::{RefError, Result};
pub use memory::InMemoryRefStore;
pub use names::{
    branch_ref, merge_ref_path, validate_branch_name, validate_namespace, validate_ref_path,
    validate_tag_name, DEFAULT_MERGE_REF_NAMESPACE,
};
pub use resolver::{ReferenceResolver, ResolvedRefs};
pub use traits::{RefStore, RepositoryQuery};
pub use types::Ref;
pub use update::RefUpdate;
