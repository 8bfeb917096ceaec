//! Built-in gate stages, in pipeline order.

pub mod authorization;
pub mod feature;
pub mod hooks;
pub mod mergeable;
pub mod rebase;
pub mod source;
pub mod strategy;

pub use authorization::AuthorizationStage;
pub use feature::FeatureStage;
pub use hooks::HookStage;
pub use mergeable::MergeableStage;
pub use rebase::RebaseStage;
pub use source::SourceStage;
pub use strategy::StrategyStage;
