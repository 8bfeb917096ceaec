use std::time::{Duration, Instant};

use tracing::{debug, info};
use mtr_types::ChangeRequest;

use crate::config::GateConfig;
use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision, StageResult};
use crate::stages::{
    AuthorizationStage, FeatureStage, HookStage, MergeableStage, RebaseStage, SourceStage,
    StrategyStage,
};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Rejected(Rejection),
}

/// The outcome of running a change request through the pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub verdict: Verdict,
    /// Per-stage results in evaluation order. Stages after a failure are
    /// absent.
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    /// True when every stage passed.
    pub fn is_proceed(&self) -> bool {
        self.verdict == Verdict::Proceed
    }

    /// The rejection that stopped the pipeline, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.verdict {
            Verdict::Proceed => None,
            Verdict::Rejected(rejection) => Some(rejection),
        }
    }

    /// `Ok` on proceed, otherwise the rejection.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self.verdict {
            Verdict::Proceed => Ok(()),
            Verdict::Rejected(rejection) => Err(rejection),
        }
    }
}

// ---------------------------------------------------------------------------
// MergeGate
// ---------------------------------------------------------------------------

/// Ordered, fail-fast validation pipeline for merge-to-ref.
pub struct MergeGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
}

impl MergeGate {
    /// An empty pipeline. Use [`Self::add_stage`] or
    /// [`Self::with_default_stages`].
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The standard pipeline:
    /// Authorization -> Feature -> Strategy -> Hooks -> Rebase -> Mergeable -> Source
    pub fn with_default_stages(config: GateConfig) -> Self {
        let feature = FeatureStage::new(config.feature_flag.clone());
        let strategy = StrategyStage::from_config(&config);
        let mut gate = Self::new(config);
        gate.add_stage(Box::new(AuthorizationStage));
        gate.add_stage(Box::new(feature));
        gate.add_stage(Box::new(strategy));
        gate.add_stage(Box::new(HookStage));
        gate.add_stage(Box::new(RebaseStage));
        gate.add_stage(Box::new(MergeableStage));
        gate.add_stage(Box::new(SourceStage));
        gate
    }

    /// Append a stage after the existing ones.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    /// Settings the default stages were built from.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Number of registered stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline. The first failing stage decides the verdict.
    pub fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();

        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(request, context)?;

            stage_results.push(StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason: match &decision {
                    StageDecision::Pass => None,
                    StageDecision::Fail(rejection) => Some(rejection.to_string()),
                },
                elapsed: stage_start.elapsed(),
            });

            if let StageDecision::Fail(rejection) = decision {
                info!(
                    request = %request.id,
                    stage = stage.name(),
                    reason = %rejection,
                    "merge to ref rejected"
                );
                return Ok(GateResult {
                    verdict: Verdict::Rejected(rejection),
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
            debug!(request = %request.id, stage = stage.name(), "stage passed");
        }

        Ok(GateResult {
            verdict: Verdict::Proceed,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}
