//! Storage and query interfaces for refs.

use mtr_types::CommitId;

use crate::error::Result;
use crate::names::{BRANCH_PREFIX, TAG_PREFIX};
use crate::types::Ref;

/// Storage backend for named references.
///
/// Implementations must be thread-safe and make each individual write atomic.
/// Concurrent writers to the same path are last-writer-wins; callers that
/// need stronger guarantees serialize externally.
pub trait RefStore: Send + Sync {
    /// Read a ref by its full path. `Ok(None)` if it does not exist.
    fn read_ref(&self, path: &str) -> Result<Option<Ref>>;

    /// Create or overwrite the ref at `path`.
    ///
    /// Tags are immutable: writing over an existing tag fails.
    fn write_ref(&self, path: &str, reference: &Ref) -> Result<()>;

    /// Delete a ref. Returns `Ok(true)` if it existed.
    fn delete_ref(&self, path: &str) -> Result<bool>;

    /// All refs whose path starts with `prefix`, sorted by path.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>>;

    fn branches(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs(BRANCH_PREFIX)
    }

    fn tags(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs(TAG_PREFIX)
    }
}

/// Read-only repository lookups used to resolve a change request.
///
/// This is the only view of the repository the validation pipeline gets. It
/// never writes.
pub trait RepositoryQuery: Send + Sync {
    /// Resolve a branch name, full ref path, or hex commit id to a commit
    /// that exists in the repository.
    fn resolve(&self, revision: &str) -> Result<Option<CommitId>>;

    /// The commit at the tip of `branch` (short name).
    fn branch_tip(&self, branch: &str) -> Result<Option<CommitId>>;

    /// Whether `ancestor` is reachable from `descendant`. A commit is its
    /// own ancestor.
    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool>;

    /// The commit an arbitrary ref path points to.
    fn ref_target(&self, path: &str) -> Result<Option<CommitId>>;
}
