//! In-memory reference store.
//!
//! [`InMemoryRefStore`] keeps every ref in a `BTreeMap` behind a `RwLock`.
//! Each write takes the lock once, so ref updates are atomic and concurrent
//! writers to the same path resolve as last-writer-wins.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_ref_path, validate_tag_name};
use crate::traits::RefStore;
use crate::types::Ref;

#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, Ref>>,
}

impl InMemoryRefStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Ref>>> {
        self.refs
            .read()
            .map_err(|e| RefError::LockPoisoned(e.to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Ref>>> {
        self.refs
            .write()
            .map_err(|e| RefError::LockPoisoned(e.to_string()))
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, path: &str) -> Result<Option<Ref>> {
        Ok(self.read_guard()?.get(path).cloned())
    }

    fn write_ref(&self, path: &str, reference: &Ref) -> Result<()> {
        match reference {
            Ref::Branch { name, .. } => validate_branch_name(name)?,
            Ref::Tag { name, .. } => validate_tag_name(name)?,
            Ref::Internal { path, .. } => validate_ref_path(path)?,
        }

        let canonical = reference.canonical_name();
        if canonical != path {
            return Err(RefError::PathMismatch {
                path: path.to_string(),
                canonical,
            });
        }

        let mut refs = self.write_guard()?;
        if reference.is_tag() && refs.get(path).is_some_and(Ref::is_tag) {
            return Err(RefError::TagImmutable {
                name: path.to_string(),
            });
        }

        let previous = refs.insert(path.to_string(), reference.clone());
        debug!(
            path,
            target = %reference.target().short_hex(),
            overwrote = previous.is_some(),
            "ref written"
        );
        Ok(())
    }

    fn delete_ref(&self, path: &str) -> Result<bool> {
        Ok(self.write_guard()?.remove(path).is_some())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        Ok(self
            .read_guard()?
            .range(prefix.to_string()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, r)| (path.clone(), r.clone()))
            .collect())
    }
}
