use mtr_types::ChangeRequest;

use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Merge-to-ref must be switched on for the request's project.
pub struct FeatureStage {
    flag: String,
}

impl FeatureStage {
    /// Check `flag` for the request's project.
    pub fn new(flag: impl Into<String>) -> Self {
        Self { flag: flag.into() }
    }
}

impl GateStage for FeatureStage {
    fn name(&self) -> &str {
        "feature"
    }

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let enabled = context.features.enabled(&self.flag, &request.id.project);
        Ok(StageDecision::check(enabled, || Rejection::FeatureDisabled {
            flag: self.flag.clone(),
        }))
    }
}
