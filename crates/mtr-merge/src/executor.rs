use mtr_refs::ResolvedRefs;
use mtr_repo::{MergeDescriptor, MergePrimitive, RepoError};
use mtr_types::{ActorContext, ChangeRequest, CommitId};
use tracing::{debug, info};

use crate::error::{MergeToRefError, Result};

/// Runs the merge primitive for an already validated change request.
pub struct MergeExecutor<'a> {
    primitive: &'a dyn MergePrimitive,
}

impl<'a> MergeExecutor<'a> {
    /// Execute merges through `primitive`.
    pub fn new(primitive: &'a dyn MergePrimitive) -> Self {
        Self { primitive }
    }

    /// Merge `resolved.source` into the target branch and write the result to
    /// `resolved.merge_ref`.
    ///
    /// An existing merge ref is overwritten. A primitive that produces no
    /// commit is a [`MergeToRefError::Conflict`]; every primitive error is a
    /// [`MergeToRefError::MergeExecution`] with the primitive's message.
    pub fn execute(
        &self,
        actor: &ActorContext,
        request: &ChangeRequest,
        resolved: &ResolvedRefs,
        message: &str,
    ) -> Result<CommitId> {
        let descriptor = MergeDescriptor {
            request: request.id.clone(),
            target_branch: request.target_branch.clone(),
            target_tip: resolved.target_tip,
            strategy: request.strategy,
        };

        let merged = self
            .primitive
            .merge_to_ref(actor, &resolved.source, &descriptor, &resolved.merge_ref, message)
            .map_err(|err| {
                if let RepoError::PreReceive { .. } = err {
                    info!(request = %request.id, reason = %err, "pre-receive hook refused merge ref");
                }
                MergeToRefError::MergeExecution(err.to_string())
            })?;

        match merged {
            Some(commit_id) => {
                debug!(
                    request = %request.id,
                    merge_ref = %resolved.merge_ref,
                    commit = %commit_id.short_hex(),
                    "merge primitive succeeded"
                );
                Ok(commit_id)
            }
            None => Err(MergeToRefError::Conflict),
        }
    }
}
