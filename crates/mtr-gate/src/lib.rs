//! Validation pipeline for merge-to-ref.
//!
//! Before a change request's merge result may be materialized under its
//! synthetic ref, it passes through an ordered, fail-fast pipeline of stages:
//!
//! 1. authorization: the actor may administer merges in the project
//! 2. feature: merge-to-ref is enabled for the project
//! 3. strategy: the merge strategy is one merge-to-ref supports
//! 4. hooks: external pre-merge validations pass
//! 5. rebase: linear-history strategies have an up-to-date source
//! 6. mergeable: the request is open and intact
//! 7. source: the source revision still resolves
//!
//! The first failing stage's [`Rejection`] is the verdict; later stages do
//! not run.

pub mod capability;
pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use capability::{
    Action, Authorization, FeatureFlags, Grant, GrantScope, GrantTable, HookList, HookValidator,
    NoHooks, StaticFeatureFlags,
};
pub use config::{GateConfig, DEFAULT_FEATURE_FLAG};
pub use error::{GateError, Rejection};
pub use gate::{GateResult, MergeGate, Verdict};
pub use stage::{GateContext, GateStage, StageDecision, StageResult};
pub use stages::{
    AuthorizationStage, FeatureStage, HookStage, MergeableStage, RebaseStage, SourceStage,
    StrategyStage,
};

#[cfg(test)]
mod tests {
    use super::*;
    use mtr_refs::{ReferenceResolver, DEFAULT_MERGE_REF_NAMESPACE};
    use mtr_repo::{InMemoryRepository, Tree};
    use mtr_types::{
        ActorContext, ActorId, ChangeRequest, ChangeRequestId, ChangeRequestState, MergeStrategy,
        SourceRevision,
    };

    const PROJECT: &str = "group/app";

    /// base -> main -> topic (up to date); base -> stale (diverged).
    struct Env {
        repo: InMemoryRepository,
        grants: GrantTable,
        flags: StaticFeatureFlags,
        hooks: Box<dyn HookValidator>,
    }

    impl Env {
        fn new() -> Self {
            let repo = InMemoryRepository::new();
            let files = |v: &str| -> Tree { [("README", v)].into_iter().collect() };
            let base = repo.commit(&[], files("0"), "x", "base").unwrap();
            let main = repo.commit(&[base], files("1"), "x", "main").unwrap();
            let topic = repo.commit(&[main], files("2"), "x", "topic").unwrap();
            let stale = repo.commit(&[base], files("0"), "x", "stale").unwrap();
            repo.set_branch("main", main).unwrap();
            repo.set_branch("topic", topic).unwrap();
            repo.set_branch("stale", stale).unwrap();

            let mut grants = GrantTable::new();
            grants.grant(
                ActorId::new("maintainer"),
                Action::AdminMergeRequest,
                GrantScope::Project(PROJECT.into()),
            );
            let mut flags = StaticFeatureFlags::new();
            flags.enable_for(DEFAULT_FEATURE_FLAG, PROJECT);

            Self {
                repo,
                grants,
                flags,
                hooks: Box::new(NoHooks),
            }
        }

        fn evaluate(&self, gate: &MergeGate, request: &ChangeRequest, actor: &ActorContext) -> GateResult {
            let resolver = ReferenceResolver::new(request, &self.repo, DEFAULT_MERGE_REF_NAMESPACE);
            let context = GateContext {
                actor,
                resolver: &resolver,
                authorization: &self.grants,
                features: &self.flags,
                hooks: self.hooks.as_ref(),
            };
            gate.evaluate(request, &context).unwrap()
        }
    }

    fn maintainer() -> ActorContext {
        ActorContext::new("maintainer", "Mae", "mae@example.com")
    }

    fn guest() -> ActorContext {
        ActorContext::new("guest", "Gus", "gus@example.com")
    }

    fn request(source: &str) -> ChangeRequest {
        ChangeRequest::new(
            ChangeRequestId::new(PROJECT, 4),
            "Topic work",
            SourceRevision::Branch(source.into()),
            "main",
        )
    }

    fn default_gate() -> MergeGate {
        MergeGate::with_default_stages(GateConfig::default())
    }

    fn rejection_of(result: &GateResult) -> String {
        result
            .rejection()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // 1. A valid request passes every stage
    // -----------------------------------------------------------------------
    #[test]
    fn valid_request_passes_all_stages() {
        let env = Env::new();
        let result = env.evaluate(&default_gate(), &request("topic"), &maintainer());
        assert!(result.is_proceed());
        assert_eq!(result.stage_results.len(), 7);
        assert!(result.stage_results.iter().all(|r| r.passed));
    }

    // -----------------------------------------------------------------------
    // 2. Stage order is fixed
    // -----------------------------------------------------------------------
    #[test]
    fn default_stage_order() {
        assert_eq!(
            default_gate().stage_names(),
            vec!["authorization", "feature", "strategy", "hooks", "rebase", "mergeable", "source"]
        );
    }

    // -----------------------------------------------------------------------
    // 3. Unauthorized actor stops at the first stage
    // -----------------------------------------------------------------------
    #[test]
    fn unauthorized_actor_is_rejected_first() {
        let env = Env::new();
        let result = env.evaluate(&default_gate(), &request("topic"), &guest());
        assert_eq!(result.rejection(), Some(&Rejection::NotAllowed));
        assert_eq!(result.stage_results.len(), 1);
        assert_eq!(
            result.stage_results[0].reason.as_deref(),
            Some("You are not allowed to merge to this ref")
        );
    }

    // -----------------------------------------------------------------------
    // 4. Authorization wins over a disabled feature
    // -----------------------------------------------------------------------
    #[test]
    fn authorization_failure_beats_feature_failure() {
        let mut env = Env::new();
        env.flags = StaticFeatureFlags::new();
        let result = env.evaluate(&default_gate(), &request("topic"), &guest());
        assert_eq!(rejection_of(&result), "You are not allowed to merge to this ref");
    }

    // -----------------------------------------------------------------------
    // 5. Feature flag must be on for this project
    // -----------------------------------------------------------------------
    #[test]
    fn feature_flag_is_scoped_to_project() {
        let mut env = Env::new();
        let mut flags = StaticFeatureFlags::new();
        flags.enable_for(DEFAULT_FEATURE_FLAG, "group/other");
        env.flags = flags;

        let result = env.evaluate(&default_gate(), &request("topic"), &maintainer());
        assert_eq!(rejection_of(&result), "Feature is not enabled");
        assert_eq!(result.stage_results.len(), 2);
    }

    // -----------------------------------------------------------------------
    // 6. Squash is unsupported by default
    // -----------------------------------------------------------------------
    #[test]
    fn squash_rejected_unless_configured() {
        let env = Env::new();
        let cr = request("topic").with_strategy(MergeStrategy::Squash);

        let result = env.evaluate(&default_gate(), &cr, &maintainer());
        assert_eq!(
            rejection_of(&result),
            "Squash to refs/merge-requests/4/merge is currently not supported."
        );
        assert!(matches!(
            result.rejection(),
            Some(Rejection::UnsupportedMethod { project, .. }) if project == PROJECT
        ));

        let squash_gate = MergeGate::with_default_stages(GateConfig {
            allow_squash: true,
            ..Default::default()
        });
        assert!(env.evaluate(&squash_gate, &cr, &maintainer()).is_proceed());
    }

    // -----------------------------------------------------------------------
    // 7. Fast-forward is not a merge-to-ref strategy by default
    // -----------------------------------------------------------------------
    #[test]
    fn fast_forward_rejected_by_default() {
        let env = Env::new();
        let cr = request("topic").with_strategy(MergeStrategy::FastForward);
        let result = env.evaluate(&default_gate(), &cr, &maintainer());
        assert_eq!(
            rejection_of(&result),
            "Fast-forward merge to refs/merge-requests/4/merge is currently not supported."
        );
    }

    // -----------------------------------------------------------------------
    // 8. Hook messages pass through verbatim
    // -----------------------------------------------------------------------
    #[test]
    fn hook_failure_message_is_verbatim() {
        let mut env = Env::new();
        env.hooks = Box::new(|_: &ChangeRequest| {
            Err::<(), _>("Commit message does not follow the pattern '^JIRA-\\d+'".to_string())
        });
        let result = env.evaluate(&default_gate(), &request("topic"), &maintainer());
        assert_eq!(
            rejection_of(&result),
            "Commit message does not follow the pattern '^JIRA-\\d+'"
        );
        assert_eq!(result.stage_results.last().unwrap().stage_name, "hooks");
    }

    // -----------------------------------------------------------------------
    // 9. Rebase requirement for linear-history strategies
    // -----------------------------------------------------------------------
    #[test]
    fn diverged_source_needs_rebase_for_rebase_merge() {
        let env = Env::new();

        let diverged = request("stale").with_strategy(MergeStrategy::RebaseMerge);
        let result = env.evaluate(&default_gate(), &diverged, &maintainer());
        assert_eq!(result.rejection(), Some(&Rejection::NeedsRebase));

        let up_to_date = request("topic").with_strategy(MergeStrategy::RebaseMerge);
        assert!(env.evaluate(&default_gate(), &up_to_date, &maintainer()).is_proceed());

        let merge_commit = request("stale");
        assert!(env.evaluate(&default_gate(), &merge_commit, &maintainer()).is_proceed());
    }

    // -----------------------------------------------------------------------
    // 10. Closed or merged requests are not mergeable to ref
    // -----------------------------------------------------------------------
    #[test]
    fn closed_request_is_not_mergeable_to_ref() {
        let env = Env::new();
        let mut cr = request("topic");
        cr.state = ChangeRequestState::Merged;
        let result = env.evaluate(&default_gate(), &cr, &maintainer());
        assert_eq!(
            rejection_of(&result),
            "Merge request is not mergeable to refs/merge-requests/4/merge"
        );
    }

    // -----------------------------------------------------------------------
    // 11. Deleted source branch
    // -----------------------------------------------------------------------
    #[test]
    fn deleted_source_is_no_source() {
        let env = Env::new();
        env.repo.delete_branch("topic").unwrap();
        let result = env.evaluate(&default_gate(), &request("topic"), &maintainer());
        assert_eq!(result.rejection(), Some(&Rejection::NoSource));
        assert_eq!(result.stage_results.len(), 7);
    }

    // -----------------------------------------------------------------------
    // 12. Every configuration still runs authorization and eligibility
    // -----------------------------------------------------------------------
    #[test]
    fn relaxed_configuration_keeps_authorization_and_eligibility() {
        let env = Env::new();
        let gate = MergeGate::with_default_stages(GateConfig {
            allow_squash: true,
            supported_strategies: MergeStrategy::ALL
                .into_iter()
                .filter(|s| *s != MergeStrategy::Squash)
                .collect(),
            ..Default::default()
        });
        let mut merged = request("topic");
        merged.state = ChangeRequestState::Merged;

        let result = env.evaluate(&gate, &merged, &guest());
        assert_eq!(result.rejection(), Some(&Rejection::NotAllowed));

        let result = env.evaluate(&gate, &merged, &maintainer());
        assert!(matches!(
            result.rejection(),
            Some(Rejection::NotMergeableToRef { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // 13. Custom stages run after the defaults
    // -----------------------------------------------------------------------
    #[test]
    fn custom_stage_runs_last() {
        struct TitleStage;

        impl GateStage for TitleStage {
            fn name(&self) -> &str {
                "title"
            }

            fn evaluate(
                &self,
                request: &ChangeRequest,
                _context: &GateContext<'_>,
            ) -> Result<StageDecision, GateError> {
                Ok(StageDecision::check(!request.title.starts_with("Draft:"), || {
                    Rejection::HookValidation {
                        message: "Draft merge requests cannot be merged".into(),
                    }
                }))
            }
        }

        let env = Env::new();
        let mut gate = default_gate();
        gate.add_stage(Box::new(TitleStage));
        assert_eq!(gate.stage_count(), 8);

        let mut cr = request("topic");
        cr.title = "Draft: Topic work".into();
        let result = env.evaluate(&gate, &cr, &maintainer());
        assert_eq!(rejection_of(&result), "Draft merge requests cannot be merged");
        assert_eq!(result.stage_results.len(), 8);
    }

    // -----------------------------------------------------------------------
    // 14. Verdict converts into a plain Result
    // -----------------------------------------------------------------------
    #[test]
    fn into_result_mirrors_verdict() {
        let env = Env::new();
        assert!(env
            .evaluate(&default_gate(), &request("topic"), &maintainer())
            .into_result()
            .is_ok());
        assert_eq!(
            env.evaluate(&default_gate(), &request("topic"), &guest())
                .into_result(),
            Err(Rejection::NotAllowed)
        );
    }
}
