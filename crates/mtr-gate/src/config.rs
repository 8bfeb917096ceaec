use serde::{Deserialize, Serialize};
use mtr_types::MergeStrategy;

use crate::error::GateError;

/// Feature flag that gates merge-to-ref per project.
pub const DEFAULT_FEATURE_FLAG: &str = "merge_to_tmp_merge_ref_path";

/// Configuration for the merge-to-ref validation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Flag that must be enabled for the request's project.
    pub feature_flag: String,
    /// Strategies merge-to-ref accepts, squash aside.
    pub supported_strategies: Vec<MergeStrategy>,
    /// Whether squash requests are materialized as single-parent commits.
    pub allow_squash: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            feature_flag: DEFAULT_FEATURE_FLAG.to_string(),
            supported_strategies: vec![MergeStrategy::MergeCommit, MergeStrategy::RebaseMerge],
            allow_squash: false,
        }
    }
}

impl GateConfig {
    /// Whether merge-to-ref handles `strategy` at all.
    pub fn supports(&self, strategy: MergeStrategy) -> bool {
        match strategy {
            MergeStrategy::Squash => self.allow_squash,
            other => self.supported_strategies.contains(&other),
        }
    }

    /// Reject an empty feature flag, or squash listed among the strategies.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.feature_flag.trim().is_empty() {
            return Err(GateError::Config("feature_flag must not be empty".into()));
        }
        if self.supported_strategies.contains(&MergeStrategy::Squash) {
            return Err(GateError::Config(
                "squash is controlled by allow_squash, not supported_strategies".into(),
            ));
        }
        Ok(())
    }
}
