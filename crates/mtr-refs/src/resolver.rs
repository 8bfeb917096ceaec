//! Turning a change request into concrete commits.
//!
//! [`ReferenceResolver`] answers three questions about a change request:
//! which commit is the source, which commit is the target tip, and which
//! synthetic ref the merge result belongs under. Answers are computed lazily
//! and cached, so every stage of one merge-to-ref call sees the same commits
//! even if the repository moves underneath it.

use std::cell::OnceCell;

use tracing::debug;
use mtr_types::{ChangeRequest, CommitId};

use crate::error::{RefError, Result};
use crate::names::merge_ref_path;
use crate::traits::RepositoryQuery;

/// Everything the merge executor needs, resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRefs {
    pub source: CommitId,
    pub target_tip: Option<CommitId>,
    pub merge_ref: String,
}

pub struct ReferenceResolver<'a> {
    request: &'a ChangeRequest,
    repository: &'a dyn RepositoryQuery,
    merge_ref: String,
    source: OnceCell<Option<CommitId>>,
    target_tip: OnceCell<Option<CommitId>>,
    fast_forward_possible: OnceCell<bool>,
}

/// `cell.get_or_try_init(f)` for stable Rust.
fn memoized<T: Clone>(cell: &OnceCell<T>, f: impl FnOnce() -> Result<T>) -> Result<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }
    let value = f()?;
    Ok(cell.get_or_init(|| value).clone())
}

impl<'a> ReferenceResolver<'a> {
    /// `namespace` is the merge-ref namespace (see [`crate::names::validate_namespace`]).
    pub fn new(
        request: &'a ChangeRequest,
        repository: &'a dyn RepositoryQuery,
        namespace: &str,
    ) -> Self {
        Self {
            request,
            repository,
            merge_ref: merge_ref_path(namespace, request.id.iid),
            source: OnceCell::new(),
            target_tip: OnceCell::new(),
            fast_forward_possible: OnceCell::new(),
        }
    }

    /// The change request being resolved.
    pub fn request(&self) -> &ChangeRequest {
        self.request
    }

    /// The synthetic destination ref. Opaque to everything downstream.
    pub fn merge_ref_path(&self) -> &str {
        &self.merge_ref
    }

    /// The source commit, or `None` if the source no longer exists.
    pub fn source_commit(&self) -> Result<Option<CommitId>> {
        memoized(&self.source, || {
            let revision = self.request.source.revision();
            let resolved = self.repository.resolve(&revision)?;
            debug!(
                request = %self.request.id,
                %revision,
                found = resolved.is_some(),
                "resolved source revision"
            );
            Ok(resolved)
        })
    }

    /// The target branch tip, or `None` if the branch does not exist.
    pub fn target_tip(&self) -> Result<Option<CommitId>> {
        memoized(&self.target_tip, || {
            self.repository.branch_tip(&self.request.target_branch)
        })
    }

    /// Whether the source already contains the target tip.
    ///
    /// `false` when either side is missing.
    pub fn fast_forward_possible(&self) -> Result<bool> {
        memoized(&self.fast_forward_possible, || {
            match (self.target_tip()?, self.source_commit()?) {
                (Some(tip), Some(source)) => self.repository.is_ancestor(&tip, &source),
                _ => Ok(false),
            }
        })
    }

    /// Whether a linear-history strategy would have to rebase first.
    pub fn should_be_rebased(&self) -> Result<bool> {
        if !self.request.strategy.requires_linear_history() {
            return Ok(false);
        }
        if self.request.rebase_required {
            return Ok(true);
        }
        Ok(!self.fast_forward_possible()?)
    }

    /// Resolve everything at once. Fails with [`RefError::NoSource`] when the
    /// source is gone.
    pub fn resolve(&self) -> Result<ResolvedRefs> {
        let source = self.source_commit()?.ok_or_else(|| RefError::NoSource {
            revision: self.request.source.revision(),
        })?;
        Ok(ResolvedRefs {
            source,
            target_tip: self.target_tip()?,
            merge_ref: self.merge_ref.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    use mtr_types::{ChangeRequestId, MergeStrategy, SourceRevision};

    fn c(n: u8) -> CommitId {
        CommitId::from_hash([n; 32])
    }

    /// Branches: main -> 2, topic -> 3 (child of 2), stale -> 4 (child of 1).
    /// Counts `resolve` calls so memoization is observable.
    struct Fixture {
        branches: HashMap<&'static str, CommitId>,
        parents: HashMap<CommitId, CommitId>,
        resolve_calls: std::sync::atomic::AtomicUsize,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                branches: HashMap::from([("main", c(2)), ("topic", c(3)), ("stale", c(4))]),
                parents: HashMap::from([(c(2), c(1)), (c(3), c(2)), (c(4), c(1))]),
                resolve_calls: Default::default(),
            }
        }
    }

    impl RepositoryQuery for Fixture {
        fn resolve(&self, revision: &str) -> Result<Option<CommitId>> {
            self.resolve_calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.branches.get(revision).copied())
        }

        fn branch_tip(&self, branch: &str) -> Result<Option<CommitId>> {
            Ok(self.branches.get(branch).copied())
        }

        fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool> {
            let mut cursor = Some(*descendant);
            while let Some(current) = cursor {
                if current == *ancestor {
                    return Ok(true);
                }
                cursor = self.parents.get(&current).copied();
            }
            Ok(false)
        }

        fn ref_target(&self, _path: &str) -> Result<Option<CommitId>> {
            Ok(None)
        }
    }

    fn request(source: &str) -> ChangeRequest {
        ChangeRequest::new(
            ChangeRequestId::new("group/app", 12),
            "Topic work",
            SourceRevision::Branch(source.into()),
            "main",
        )
    }

    #[test]
    fn merge_ref_path_comes_from_request_identity() {
        let repo = Fixture::new();
        let cr = request("topic");
        let resolver = ReferenceResolver::new(&cr, &repo, "merge-requests");
        assert_eq!(resolver.merge_ref_path(), "refs/merge-requests/12/merge");
    }

    #[test]
    fn resolves_source_and_target() {
        let repo = Fixture::new();
        let cr = request("topic");
        let resolved = ReferenceResolver::new(&cr, &repo, "merge-requests")
            .resolve()
            .unwrap();
        assert_eq!(resolved.source, c(3));
        assert_eq!(resolved.target_tip, Some(c(2)));
    }

    #[test]
    fn missing_source_is_no_source() {
        let repo = Fixture::new();
        let cr = request("deleted-branch");
        let err = ReferenceResolver::new(&cr, &repo, "merge-requests")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, RefError::NoSource { ref revision } if revision == "deleted-branch"));
    }

    #[test]
    fn source_lookup_is_memoized() {
        let repo = Fixture::new();
        let cr = request("topic");
        let resolver = ReferenceResolver::new(&cr, &repo, "merge-requests");
        resolver.source_commit().unwrap();
        resolver.fast_forward_possible().unwrap();
        resolver.resolve().unwrap();
        assert_eq!(
            repo.resolve_calls.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[test]
    fn rebase_needed_only_for_linear_strategies_on_diverged_source() {
        let repo = Fixture::new();

        let diverged = request("stale").with_strategy(MergeStrategy::RebaseMerge);
        assert!(ReferenceResolver::new(&diverged, &repo, "mr")
            .should_be_rebased()
            .unwrap());

        let up_to_date = request("topic").with_strategy(MergeStrategy::FastForward);
        assert!(!ReferenceResolver::new(&up_to_date, &repo, "mr")
            .should_be_rebased()
            .unwrap());

        let merge_commit = request("stale");
        assert!(!ReferenceResolver::new(&merge_commit, &repo, "mr")
            .should_be_rebased()
            .unwrap());
    }

    #[test]
    fn rebase_flag_forces_rebase_for_linear_strategies() {
        let repo = Fixture::new();
        let mut cr = request("topic").with_strategy(MergeStrategy::RebaseMerge);
        cr.rebase_required = true;
        assert!(ReferenceResolver::new(&cr, &repo, "mr")
            .should_be_rebased()
            .unwrap());
    }

    #[test]
    fn missing_target_means_no_fast_forward() {
        let repo = Fixture::new();
        let mut cr = request("topic").with_strategy(MergeStrategy::FastForward);
        cr.target_branch = "gone".into();
        let resolver = ReferenceResolver::new(&cr, &repo, "mr");
        assert!(!resolver.fast_forward_possible().unwrap());
        assert!(resolver.should_be_rebased().unwrap());
    }

    #[test]
    fn memoized_helper_only_runs_once() {
        let cell = OnceCell::new();
        let runs = Cell::new(0);
        for _ in 0..3 {
            let v = memoized(&cell, || {
                runs.set(runs.get() + 1);
                Ok(5)
            })
            .unwrap();
            assert_eq!(v, 5);
        }
        assert_eq!(runs.get(), 1);
    }
}
