//! Pre-receive hooks run before every ref write.

use tracing::warn;
use mtr_refs::RefUpdate;

use crate::error::{RepoError, RepoResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookResult {
    Allow,
    Reject { reason: String },
}

/// A check that can veto a ref update before it lands.
pub trait PreReceiveHook: Send + Sync {
    fn name(&self) -> &str;

    fn pre_receive(&self, update: &RefUpdate) -> HookResult;
}

impl<F> PreReceiveHook for F
where
    F: Fn(&RefUpdate) -> HookResult + Send + Sync,
{
    fn name(&self) -> &str {
        "inline"
    }

    fn pre_receive(&self, update: &RefUpdate) -> HookResult {
        self(update)
    }
}

/// Hooks in registration order. The first rejection wins.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn PreReceiveHook>>,
}

impl HookChain {
    /// A chain with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook. Hooks run in insertion order.
    pub fn push(&mut self, hook: Box<dyn PreReceiveHook>) {
        self.hooks.push(hook);
    }

    /// Number of hooks in the chain.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// True when no hook is installed.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook against `update`; a rejection becomes
    /// [`RepoError::PreReceive`] carrying the hook's reason unchanged.
    pub fn run(&self, update: &RefUpdate) -> RepoResult<()> {
        for hook in &self.hooks {
            if let HookResult::Reject { reason } = hook.pre_receive(update) {
                warn!(hook = hook.name(), ref_name = %update.ref_name, %reason, "pre-receive hook rejected update");
                return Err(RepoError::pre_receive(reason));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}
