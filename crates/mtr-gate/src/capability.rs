//! Capabilities the pipeline queries: authorization, feature flags and
//! integration hooks.
//!
//! Each is a trait object handed to the pipeline per call; nothing is read
//! from ambient state. Closures implement all three traits, and a static
//! implementation of each is provided for configuration-driven setups and
//! tests.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use mtr_types::{ActorContext, ActorId, ChangeRequest};

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Operations an actor may be authorized for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ReadMergeRequest,
    UpdateMergeRequest,
    /// Required to merge, including merging to a synthetic ref.
    AdminMergeRequest,
}

/// Answers "may `actor` perform `action` on `resource`?".
pub trait Authorization: Send + Sync {
    fn allowed(&self, actor: &ActorContext, action: Action, resource: &str) -> bool;
}

impl<F> Authorization for F
where
    F: Fn(&ActorContext, Action, &str) -> bool + Send + Sync,
{
    fn allowed(&self, actor: &ActorContext, action: Action, resource: &str) -> bool {
        self(actor, action, resource)
    }
}

/// Where a grant applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantScope {
    Global,
    /// A project path, e.g. "group/app".
    Project(String),
}

impl GrantScope {
    fn covers(&self, resource: &str) -> bool {
        match self {
            GrantScope::Global => true,
            GrantScope::Project(project) => project == resource,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub action: Action,
    pub scope: GrantScope,
}

/// Static actor → grants table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GrantTable {
    grants: HashMap<ActorId, Vec<Grant>>,
}

impl GrantTable {
    /// An empty table: nobody may do anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `actor` to perform `action` within `scope`.
    pub fn grant(&mut self, actor: ActorId, action: Action, scope: GrantScope) -> &mut Self {
        self.grants
            .entry(actor)
            .or_default()
            .push(Grant { action, scope });
        self
    }
}

impl Authorization for GrantTable {
    fn allowed(&self, actor: &ActorContext, action: Action, resource: &str) -> bool {
        self.grants.get(&actor.id).is_some_and(|grants| {
            grants
                .iter()
                .any(|g| g.action == action && g.scope.covers(resource))
        })
    }
}

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// Answers "is `flag` on for `scope`?". The scope is a project path.
pub trait FeatureFlags: Send + Sync {
    fn enabled(&self, flag: &str, scope: &str) -> bool;
}

impl<F> FeatureFlags for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn enabled(&self, flag: &str, scope: &str) -> bool {
        self(flag, scope)
    }
}

/// Flags switched on globally or per scope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFeatureFlags {
    global: HashSet<String>,
    scoped: HashMap<String, HashSet<String>>,
}

impl StaticFeatureFlags {
    /// No flag enabled anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable `flag` for every project.
    pub fn enable(&mut self, flag: impl Into<String>) -> &mut Self {
        self.global.insert(flag.into());
        self
    }

    /// Enable `flag` for the project at path `scope` only.
    pub fn enable_for(&mut self, flag: impl Into<String>, scope: impl Into<String>) -> &mut Self {
        self.scoped
            .entry(flag.into())
            .or_default()
            .insert(scope.into());
        self
    }
}

impl FeatureFlags for StaticFeatureFlags {
    fn enabled(&self, flag: &str, scope: &str) -> bool {
        self.global.contains(flag)
            || self
                .scoped
                .get(flag)
                .is_some_and(|scopes| scopes.contains(scope))
    }
}

// ---------------------------------------------------------------------------
// Integration hooks
// ---------------------------------------------------------------------------

/// Externally configured pre-merge validation. `Err` carries the message
/// shown to the user.
pub trait HookValidator: Send + Sync {
    fn validate(&self, request: &ChangeRequest) -> Result<(), String>;
}

impl<F> HookValidator for F
where
    F: Fn(&ChangeRequest) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, request: &ChangeRequest) -> Result<(), String> {
        self(request)
    }
}

/// No integration hooks configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl HookValidator for NoHooks {
    fn validate(&self, _request: &ChangeRequest) -> Result<(), String> {
        Ok(())
    }
}

/// Several validators run in order; the first failure wins.
#[derive(Default)]
pub struct HookList {
    validators: Vec<Box<dyn HookValidator>>,
}

impl HookList {
    /// A list with no validators; every request passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validator. Validators run in insertion order.
    pub fn with(mut self, validator: impl HookValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl HookValidator for HookList {
    fn validate(&self, request: &ChangeRequest) -> Result<(), String> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(request))
    }
}
