//! Path-level three-way merge.
//!
//! Each path is merged independently: if only one side changed it relative
//! to the base, that side wins; if both sides made the same change, the
//! change is kept; otherwise the path conflicts. Deletion counts as a
//! change. There is no line-level merging.

use std::collections::BTreeSet;

use crate::object::Tree;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeMerge {
    Clean(Tree),
    /// Paths both sides changed differently, sorted.
    Conflicted(Vec<String>),
}

impl TreeMerge {
    /// True when no path conflicted.
    pub fn is_clean(&self) -> bool {
        matches!(self, TreeMerge::Clean(_))
    }
}

/// Merge `ours` and `theirs` relative to `base`. A missing base (unrelated
/// histories) behaves like an empty tree.
pub fn three_way_merge(base: Option<&Tree>, ours: &Tree, theirs: &Tree) -> TreeMerge {
    let empty = Tree::new();
    let base = base.unwrap_or(&empty);

    let paths: BTreeSet<&String> = base
        .paths()
        .chain(ours.paths())
        .chain(theirs.paths())
        .collect();

    let mut merged = Tree::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let (b, o, t) = (base.get(path), ours.get(path), theirs.get(path));
        let resolved = if o == t || b == t {
            o
        } else if b == o {
            t
        } else {
            conflicts.push(path.clone());
            continue;
        };
        if let Some(contents) = resolved {
            merged.insert(path.clone(), contents.clone());
        }
    }

    if conflicts.is_empty() {
        TreeMerge::Clean(merged)
    } else {
        TreeMerge::Conflicted(conflicts)
    }
}
