use mtr_gate::GateConfig;
use mtr_refs::{validate_namespace, DEFAULT_MERGE_REF_NAMESPACE};
use serde::{Deserialize, Serialize};

use crate::error::{MergeToRefError, Result};
use crate::message::DEFAULT_COMMIT_MESSAGE_TEMPLATE;

/// Service-level configuration.
///
/// ```toml
/// project = "group/app"
/// merge_ref_namespace = "merge-requests"
///
/// [gate]
/// allow_squash = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeToRefConfig {
    /// Project whose repository the service writes to. Merge refs are keyed
    /// by iid only, so requests from any other project are refused when set.
    pub project: Option<String>,
    /// Merge results are written to `refs/<namespace>/<iid>/merge`.
    pub merge_ref_namespace: String,
    /// Used when a change request carries no template of its own.
    pub commit_message_template: String,
    pub gate: GateConfig,
}

impl Default for MergeToRefConfig {
    fn default() -> Self {
        Self {
            project: None,
            merge_ref_namespace: DEFAULT_MERGE_REF_NAMESPACE.to_string(),
            commit_message_template: DEFAULT_COMMIT_MESSAGE_TEMPLATE.to_string(),
            gate: GateConfig::default(),
        }
    }
}

impl MergeToRefConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| MergeToRefError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the namespace, the template, the project and the gate settings.
    pub fn validate(&self) -> Result<()> {
        if self.project.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(MergeToRefError::Config("project must not be empty".into()));
        }
        validate_namespace(&self.merge_ref_namespace)
            .map_err(|e| MergeToRefError::Config(e.to_string()))?;
        if self.commit_message_template.trim().is_empty() {
            return Err(MergeToRefError::Config(
                "commit_message_template must not be empty".into(),
            ));
        }
        self.gate.validate()?;
        Ok(())
    }
}
