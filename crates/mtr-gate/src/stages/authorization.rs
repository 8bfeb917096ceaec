use mtr_types::ChangeRequest;

use crate::capability::Action;
use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// The actor must be allowed to administer merges in the request's project.
pub struct AuthorizationStage;

impl GateStage for AuthorizationStage {
    fn name(&self) -> &str {
        "authorization"
    }

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let allowed = context.authorization.allowed(
            context.actor,
            Action::AdminMergeRequest,
            &request.id.project,
        );
        Ok(StageDecision::check(allowed, || Rejection::NotAllowed))
    }
}
