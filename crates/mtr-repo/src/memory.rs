//! In-memory repository implementing both the query and merge faces.
//!
//! Commits live in a `HashMap` behind a `RwLock`; refs live in an
//! [`InMemoryRefStore`]. Every ref write made through this type passes the
//! configured [`HookChain`] first.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{RwLock, RwLockReadGuard};

use tracing::{debug, info};
use mtr_refs::names::{branch_ref, BRANCH_PREFIX, TAG_PREFIX};
use mtr_refs::{InMemoryRefStore, Ref, RefError, RefStore, RefUpdate, RepositoryQuery};
use mtr_types::{ActorContext, CommitId, MergeStrategy};

use crate::error::{RepoError, RepoResult};
use crate::hooks::{HookChain, PreReceiveHook};
use crate::merge::{three_way_merge, TreeMerge};
use crate::object::{Commit, Tree};
use crate::traits::{MergeDescriptor, MergePrimitive};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    commits: RwLock<HashMap<CommitId, Commit>>,
    refs: InMemoryRefStore,
    hooks: HookChain,
}

impl InMemoryRepository {
    /// An empty repository with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-receive hook. Hooks run in registration order.
    pub fn with_hook(mut self, hook: impl PreReceiveHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// The underlying ref store.
    pub fn refs(&self) -> &InMemoryRefStore {
        &self.refs
    }

    fn commits(&self) -> RepoResult<RwLockReadGuard<'_, HashMap<CommitId, Commit>>> {
        self.commits
            .read()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))
    }

    /// Store a commit and return its id. Parents must already exist.
    pub fn commit(
        &self,
        parents: &[CommitId],
        tree: Tree,
        author: &str,
        message: &str,
    ) -> RepoResult<CommitId> {
        let commit = Commit {
            parents: parents.to_vec(),
            tree,
            author: author.to_string(),
            message: message.to_string(),
        };
        let id = commit.id()?;

        let mut commits = self
            .commits
            .write()
            .map_err(|e| RepoError::LockPoisoned(e.to_string()))?;
        if let Some(missing) = parents.iter().find(|p| !commits.contains_key(*p)) {
            return Err(RepoError::UnknownCommit(*missing));
        }
        commits.entry(id).or_insert(commit);
        debug!(commit = %id.short_hex(), parents = parents.len(), "stored commit");
        Ok(id)
    }

    /// Look up a stored commit.
    pub fn read_commit(&self, id: &CommitId) -> RepoResult<Commit> {
        self.commits()?
            .get(id)
            .cloned()
            .ok_or(RepoError::UnknownCommit(*id))
    }

    /// Point `branch` at `target`, running hooks like any other ref write.
    pub fn set_branch(&self, branch: &str, target: CommitId) -> RepoResult<()> {
        if !self.commits()?.contains_key(&target) {
            return Err(RepoError::UnknownCommit(target));
        }
        let path = branch_ref(branch);
        self.update_ref(
            &path,
            Ref::Branch {
                name: branch.to_string(),
                target,
            },
        )
    }

    /// Delete `branch`. Returns `false` when it did not exist.
    pub fn delete_branch(&self, branch: &str) -> RepoResult<bool> {
        let path = branch_ref(branch);
        let Some(old) = self.ref_target(&path)? else {
            return Ok(false);
        };
        self.hooks
            .run(&RefUpdate::new(&path, old, CommitId::null()))?;
        Ok(self.refs.delete_ref(&path)?)
    }

    fn update_ref(&self, path: &str, reference: Ref) -> RepoResult<()> {
        let old = self.ref_target(path)?.unwrap_or_else(CommitId::null);
        self.hooks
            .run(&RefUpdate::new(path, old, reference.target()))?;
        self.refs.write_ref(path, &reference)?;
        Ok(())
    }

    /// Nearest common ancestor of `a` and `b`, if the histories meet.
    pub fn merge_base(&self, a: &CommitId, b: &CommitId) -> RepoResult<Option<CommitId>> {
        let commits = self.commits()?;
        let reachable_from_a = ancestry(&commits, a);

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([*b]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if reachable_from_a.contains(&current) {
                return Ok(Some(current));
            }
            if let Some(commit) = commits.get(&current) {
                queue.extend(commit.parents.iter().copied());
            }
        }
        Ok(None)
    }

    /// The tree the merge would produce, or the conflicting paths.
    fn merged_tree(&self, target_tip: &CommitId, source: &CommitId) -> RepoResult<TreeMerge> {
        let base = self.merge_base(target_tip, source)?;
        let base_tree = base.map(|id| self.read_commit(&id)).transpose()?;
        let ours = self.read_commit(target_tip)?;
        let theirs = self.read_commit(source)?;
        Ok(three_way_merge(
            base_tree.as_ref().map(|c| &c.tree),
            &ours.tree,
            &theirs.tree,
        ))
    }
}

/// Every commit reachable from `start`, including `start`.
fn ancestry(commits: &HashMap<CommitId, Commit>, start: &CommitId) -> HashSet<CommitId> {
    let mut seen = HashSet::new();
    let mut stack = vec![*start];
    while let Some(current) = stack.pop() {
        if seen.insert(current) {
            if let Some(commit) = commits.get(&current) {
                stack.extend(commit.parents.iter().copied());
            }
        }
    }
    seen
}

impl RepositoryQuery for InMemoryRepository {
    /// Resolution order: full ref path, branch, tag, then a full hex SHA.
    /// A branch named like a SHA therefore wins over the commit.
    fn resolve(&self, revision: &str) -> mtr_refs::Result<Option<CommitId>> {
        if revision.starts_with("refs/") {
            return self.ref_target(revision);
        }
        for path in [
            format!("{BRANCH_PREFIX}{revision}"),
            format!("{TAG_PREFIX}{revision}"),
        ] {
            if let Some(id) = self.ref_target(&path)? {
                return Ok(Some(id));
            }
        }
        if CommitId::looks_like_hex(revision) {
            let id = CommitId::from_hex(revision).map_err(|e| RefError::Backend(e.to_string()))?;
            let exists = self
                .commits()
                .map_err(|e| RefError::Backend(e.to_string()))?
                .contains_key(&id);
            return Ok(exists.then_some(id));
        }
        Ok(None)
    }

    fn branch_tip(&self, branch: &str) -> mtr_refs::Result<Option<CommitId>> {
        self.ref_target(&branch_ref(branch))
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> mtr_refs::Result<bool> {
        let commits = self
            .commits()
            .map_err(|e| RefError::Backend(e.to_string()))?;
        Ok(ancestry(&commits, descendant).contains(ancestor))
    }

    fn ref_target(&self, path: &str) -> mtr_refs::Result<Option<CommitId>> {
        Ok(self.refs.read_ref(path)?.map(|r| r.target()))
    }
}

impl MergePrimitive for InMemoryRepository {
    fn merge_to_ref(
        &self,
        actor: &ActorContext,
        source: &CommitId,
        descriptor: &MergeDescriptor,
        destination_ref: &str,
        message: &str,
    ) -> RepoResult<Option<CommitId>> {
        if destination_ref.starts_with(BRANCH_PREFIX) || destination_ref.starts_with(TAG_PREFIX) {
            return Err(RepoError::ProtectedRef(destination_ref.to_string()));
        }
        let target_tip = match descriptor.target_tip {
            Some(tip) => tip,
            None => self
                .branch_tip(&descriptor.target_branch)?
                .ok_or_else(|| RepoError::BranchNotFound(descriptor.target_branch.clone()))?,
        };
        {
            let commits = self.commits()?;
            if let Some(missing) = [target_tip, *source].iter().find(|id| !commits.contains_key(*id)) {
                return Err(RepoError::UnknownCommit(*missing));
            }
        }

        let result = match descriptor.strategy {
            MergeStrategy::FastForward => {
                if self.is_ancestor(&target_tip, source)? {
                    Some(*source)
                } else {
                    None
                }
            }
            strategy => match self.merged_tree(&target_tip, source)? {
                TreeMerge::Conflicted(paths) => {
                    info!(
                        request = %descriptor.request,
                        conflicts = paths.len(),
                        "merge has conflicts"
                    );
                    None
                }
                TreeMerge::Clean(tree) => {
                    let parents = if strategy == MergeStrategy::Squash {
                        vec![target_tip]
                    } else {
                        vec![target_tip, *source]
                    };
                    Some(self.commit(&parents, tree, &actor.author_line(), message)?)
                }
            },
        };

        let Some(commit_id) = result else {
            return Ok(None);
        };
        self.update_ref(
            destination_ref,
            Ref::Internal {
                path: destination_ref.to_string(),
                target: commit_id,
            },
        )?;
        debug!(
            request = %descriptor.request,
            destination_ref,
            commit = %commit_id.short_hex(),
            "merge written to ref"
        );
        Ok(Some(commit_id))
    }
}
