use mtr_types::ChangeRequest;

use crate::config::GateConfig;
use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Only strategies merge-to-ref knows how to materialize may proceed.
/// Squash is accepted only when the configuration allows it.
pub struct StrategyStage {
    config: GateConfig,
}

impl StrategyStage {
    /// Take the allowed strategies from `config`.
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl GateStage for StrategyStage {
    fn name(&self) -> &str {
        "strategy"
    }

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(StageDecision::check(self.config.supports(request.strategy), || {
            Rejection::UnsupportedMethod {
                strategy: request.strategy,
                project: request.id.project.clone(),
                merge_ref: context.resolver.merge_ref_path().to_string(),
            }
        }))
    }
}
