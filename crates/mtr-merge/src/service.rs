//! [`MergeToRefService`]: the entry point for merge-to-ref.

use std::sync::Arc;

use mtr_gate::{
    Authorization, FeatureFlags, GateContext, GrantTable, HookValidator, MergeGate, NoHooks,
    StaticFeatureFlags,
};
use mtr_refs::{ReferenceResolver, RepositoryQuery};
use mtr_repo::MergePrimitive;
use mtr_types::{ActorContext, ChangeRequest, CommitId};
use tracing::{debug, info, warn};

use crate::config::MergeToRefConfig;
use crate::error::{MergeToRefError, Result};
use crate::executor::MergeExecutor;
use crate::message::commit_message;
use crate::outcome::{MergeOutcome, MergeState};

/// Validates a change request and materializes its merge under the
/// request's synthetic ref.
///
/// The service holds no per-call state. Calls for different change requests
/// are independent; concurrent calls for the same request race on the ref
/// write and the last writer wins.
///
/// Merge refs are keyed by iid alone, so one service serves one project's
/// repository. Set [`MergeToRefConfig::project`] to refuse requests from
/// other projects.
///
/// Without explicit collaborators nobody is authorized, no feature flag is
/// on and no integration hooks run.
pub struct MergeToRefService {
    config: MergeToRefConfig,
    gate: MergeGate,
    repository: Arc<dyn RepositoryQuery>,
    primitive: Arc<dyn MergePrimitive>,
    authorization: Arc<dyn Authorization>,
    features: Arc<dyn FeatureFlags>,
    hooks: Arc<dyn HookValidator>,
}

impl MergeToRefService {
    /// Build a service from a validated `config`. Fails on an invalid configuration.
    pub fn new(
        config: MergeToRefConfig,
        repository: Arc<dyn RepositoryQuery>,
        primitive: Arc<dyn MergePrimitive>,
    ) -> Result<Self> {
        config.validate()?;
        let gate = MergeGate::with_default_stages(config.gate.clone());
        Ok(Self {
            config,
            gate,
            repository,
            primitive,
            authorization: Arc::new(GrantTable::new()),
            features: Arc::new(StaticFeatureFlags::new()),
            hooks: Arc::new(NoHooks),
        })
    }

    /// Build a service over a backend that answers queries and merges.
    pub fn over<R>(config: MergeToRefConfig, repository: Arc<R>) -> Result<Self>
    where
        R: RepositoryQuery + MergePrimitive + 'static,
    {
        let primitive: Arc<dyn MergePrimitive> = repository.clone();
        Self::new(config, repository, primitive)
    }

    /// Decide who may merge with `authorization`.
    pub fn with_authorization(mut self, authorization: Arc<dyn Authorization>) -> Self {
        self.authorization = authorization;
        self
    }

    /// Read feature flags from `features`.
    pub fn with_feature_flags(mut self, features: Arc<dyn FeatureFlags>) -> Self {
        self.features = features;
        self
    }

    /// Run `hooks` as the integration hook stage.
    pub fn with_hooks(mut self, hooks: Arc<dyn HookValidator>) -> Self {
        self.hooks = hooks;
        self
    }

    /// The configuration the service was built with.
    pub fn config(&self) -> &MergeToRefConfig {
        &self.config
    }

    /// The validation pipeline every call runs through.
    pub fn gate(&self) -> &MergeGate {
        &self.gate
    }

    /// Validate `request` for `actor` and, if every check passes, write the
    /// merge result to the request's merge ref.
    ///
    /// Never panics on a failing collaborator; every failure is reported as
    /// [`MergeOutcome::Failure`].
    pub fn execute_merge_to_ref(&self, request: &ChangeRequest, actor: &ActorContext) -> MergeOutcome {
        debug!(request = %request.id, actor = %actor.id, state = %MergeState::Start, "merge to ref");
        let result = self.run(request, actor);

        let state = MergeState::terminal(&result);
        match &result {
            Ok(commit_id) => info!(
                request = %request.id,
                state = %state,
                commit = %commit_id.short_hex(),
                "merge to ref finished"
            ),
            Err(err) => info!(
                request = %request.id,
                state = %state,
                reason = %err,
                "merge to ref finished"
            ),
        }
        MergeOutcome::report(result)
    }

    fn run(&self, request: &ChangeRequest, actor: &ActorContext) -> Result<CommitId> {
        if let Some(project) = &self.config.project {
            if *project != request.id.project {
                return Err(MergeToRefError::ForeignProject {
                    request: request.id.to_string(),
                    project: project.clone(),
                });
            }
        }

        let resolver = ReferenceResolver::new(
            request,
            self.repository.as_ref(),
            &self.config.merge_ref_namespace,
        );

        debug!(request = %request.id, state = %MergeState::Validating, "running validation pipeline");
        let context = GateContext {
            actor,
            resolver: &resolver,
            authorization: self.authorization.as_ref(),
            features: self.features.as_ref(),
            hooks: self.hooks.as_ref(),
        };
        self.gate.evaluate(request, &context)?.into_result()?;

        let resolved = resolver.resolve()?;
        debug!(
            request = %request.id,
            state = %MergeState::Merging,
            source = %resolved.source.short_hex(),
            merge_ref = %resolved.merge_ref,
            "merging"
        );
        let message = commit_message(request, &resolved.source, &self.config.commit_message_template);
        MergeExecutor::new(self.primitive.as_ref()).execute(actor, request, &resolved, &message)
    }

    /// [`Self::execute_merge_to_ref`] on tokio's blocking pool, for async
    /// callers. A worker that panics is reported as a merge execution
    /// failure.
    pub async fn execute_blocking(self: Arc<Self>, request: ChangeRequest, actor: ActorContext) -> MergeOutcome {
        let id = request.id.clone();
        let worker =
            tokio::task::spawn_blocking(move || self.execute_merge_to_ref(&request, &actor));
        match worker.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                warn!(request = %id, error = %join_error, "merge to ref worker failed");
                MergeOutcome::failure(&MergeToRefError::MergeExecution(format!(
                    "merge worker failed: {join_error}"
                )))
            }
        }
    }
}
