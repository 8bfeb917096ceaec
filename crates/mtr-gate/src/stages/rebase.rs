use mtr_types::ChangeRequest;

use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Linear-history strategies need the source to already contain the target
/// tip.
pub struct RebaseStage;

impl GateStage for RebaseStage {
    fn name(&self) -> &str {
        "rebase"
    }

    fn evaluate(
        &self,
        _request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let needs_rebase = context.resolver.should_be_rebased()?;
        Ok(StageDecision::check(!needs_rebase, || Rejection::NeedsRebase))
    }
}
