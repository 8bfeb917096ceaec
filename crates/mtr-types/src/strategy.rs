use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How a change request's source history is combined with the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Always create a merge commit with two parents.
    MergeCommit,
    /// Merge commit, but only when the source already contains the target tip.
    RebaseMerge,
    /// Move the target to the source; no merge commit.
    FastForward,
    /// Collapse the source into a single commit on top of the target.
    Squash,
}

impl MergeStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [MergeStrategy; 4] = [
        MergeStrategy::MergeCommit,
        MergeStrategy::RebaseMerge,
        MergeStrategy::FastForward,
        MergeStrategy::Squash,
    ];

    /// Name shown to people in error messages.
    pub fn human_name(&self) -> &'static str {
        match self {
            MergeStrategy::MergeCommit => "Merge commit",
            MergeStrategy::RebaseMerge => "Merge commit with semi-linear history",
            MergeStrategy::FastForward => "Fast-forward merge",
            MergeStrategy::Squash => "Squash",
        }
    }

    /// Stable machine name (the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::MergeCommit => "merge-commit",
            MergeStrategy::RebaseMerge => "rebase-merge",
            MergeStrategy::FastForward => "fast-forward",
            MergeStrategy::Squash => "squash",
        }
    }

    /// Whether the source must descend from the target tip before merging.
    pub fn requires_linear_history(&self) -> bool {
        matches!(self, MergeStrategy::RebaseMerge | MergeStrategy::FastForward)
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| TypeError::UnknownStrategy(s.to_string()))
    }
}
