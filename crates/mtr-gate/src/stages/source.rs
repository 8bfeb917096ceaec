use mtr_types::ChangeRequest;

use crate::error::{GateError, Rejection};
use crate::stage::{GateContext, GateStage, StageDecision};

/// The source revision must still resolve to a commit.
pub struct SourceStage;

impl GateStage for SourceStage {
    fn name(&self) -> &str {
        "source"
    }

    fn evaluate(
        &self,
        _request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let source = context.resolver.source_commit()?;
        Ok(StageDecision::check(source.is_some(), || Rejection::NoSource))
    }
}
