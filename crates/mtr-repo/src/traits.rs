use serde::{Deserialize, Serialize};
use mtr_types::{ActorContext, ChangeRequestId, CommitId, MergeStrategy};

use crate::error::RepoResult;

/// What the merge primitive needs to know about the change request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDescriptor {
    pub request: ChangeRequestId,
    /// Short name of the branch the source is merged into.
    pub target_branch: String,
    /// Target tip the request was validated against. The merge is computed
    /// against this commit; when `None` the current branch tip is read.
    pub target_tip: Option<CommitId>,
    pub strategy: MergeStrategy,
}

/// Computes a merge and force-writes the result to a ref.
///
/// Contract:
/// - `Ok(Some(id))`: the merge commit `id` now sits at `destination_ref`.
/// - `Ok(None)`: the two sides cannot be combined automatically. Nothing is
///   written.
/// - `Err(RepoError::PreReceive { .. })`: a hook refused the ref update.
/// - any other `Err`: the backend failed.
///
/// Identical inputs must produce the identical commit id, and an existing
/// `destination_ref` is overwritten rather than treated as an error.
/// Implementations may block on I/O.
pub trait MergePrimitive: Send + Sync {
    fn merge_to_ref(
        &self,
        actor: &ActorContext,
        source: &CommitId,
        descriptor: &MergeDescriptor,
        destination_ref: &str,
        message: &str,
    ) -> RepoResult<Option<CommitId>>;
}
