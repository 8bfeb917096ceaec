use std::time::Duration;

use mtr_refs::ReferenceResolver;
use mtr_types::{ActorContext, ChangeRequest};

use crate::capability::{Authorization, FeatureFlags, HookValidator};
use crate::error::{GateError, Rejection};

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single stage: carry on, or stop with a reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    Pass,
    Fail(Rejection),
}

impl StageDecision {
    /// True for [`StageDecision::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// True for [`StageDecision::Fail`].
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// `Pass` when `ok`, otherwise fail with `rejection()`.
    pub fn check(ok: bool, rejection: impl FnOnce() -> Rejection) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail(rejection())
        }
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result of a stage that ran.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// The rejection message, on failure.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Everything a stage may consult besides the change request itself.
///
/// Collaborators are borrowed for the duration of one evaluation; the gate
/// keeps no state between calls.
pub struct GateContext<'a> {
    pub actor: &'a ActorContext,
    pub resolver: &'a ReferenceResolver<'a>,
    pub authorization: &'a dyn Authorization,
    pub features: &'a dyn FeatureFlags,
    pub hooks: &'a dyn HookValidator,
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single check in the pipeline.
///
/// Stages run in order and the first `Fail` ends the evaluation. Returning
/// `Err` means the stage could not decide at all (for example, the repository
/// lookup it needed failed).
pub trait GateStage: Send + Sync {
    /// Short name used in stage results and logs (e.g. "authorization").
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        request: &ChangeRequest,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError>;
}
