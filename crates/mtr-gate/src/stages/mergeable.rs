use mtr_types::ChangeRequest;

use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// The request must report itself eligible (open and intact).
pub struct MergeableStage;

impl GateStage for MergeableStage {
    fn name(&self) -> &str {
        "mergeable"
    }

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(StageDecision::check(request.mergeable_to_ref(), || {
            Rejection::NotMergeableToRef {
                merge_ref: context.resolver.merge_ref_path().to_string(),
            }
        }))
    }
}
