use mtr_types::ChangeRequest;

use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Externally configured pre-merge validations; their message is passed
/// through untouched.
pub struct HookStage;

impl GateStage for HookStage {
    fn name(&self) -> &str {
        "hooks"
    }

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(match context.hooks.validate(request) {
            Ok(()) => StageDecision::Pass,
            Err(message) => StageDecision::Fail(Rejection::HookValidation { message }),
        })
    }
}
