//! In-memory namespace store for testing and ephemeral use.
//!
//! [`InMemoryNamespaceStore`] keeps every namespace in a `HashMap` protected
//! by a `RwLock`. It implements the full [`NamespaceStore`] trait.

use std::collections::HashMap;
use std::sync::RwLock;

use cas_types::Cid;

use crate::error::{RefError, Result};
use crate::names::validate_name;
use crate::traits::NamespaceStore;
use crate::types::{HistoryEntry, Namespace};

#[derive(Debug, Default, Clone)]
struct NamespaceState {
    latest: Option<Cid>,
    history: Vec<HistoryEntry>,
}

/// An in-memory implementation of [`NamespaceStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryNamespaceStore {
    namespaces: RwLock<HashMap<Namespace, NamespaceState>>,
}

impl InMemoryNamespaceStore {
    /// Create a new empty namespace store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> RefError {
    RefError::Poisoned(e.to_string())
}

impl NamespaceStore for InMemoryNamespaceStore {
    fn update_latest(&self, ns: &Namespace, cid: &Cid) -> Result<()> {
        let mut map = self.namespaces.write().map_err(poisoned)?;
        map.entry(ns.clone()).or_default().latest = Some(*cid);
        Ok(())
    }

    fn latest(&self, ns: &Namespace) -> Result<Option<Cid>> {
        let map = self.namespaces.read().map_err(poisoned)?;
        Ok(map.get(ns).and_then(|state| state.latest))
    }

    fn append_entry(&self, ns: &Namespace, entry: &HistoryEntry) -> Result<()> {
        let mut map = self.namespaces.write().map_err(poisoned)?;
        map.entry(ns.clone()).or_default().history.push(entry.clone());
        Ok(())
    }

    fn read_history(&self, ns: &Namespace) -> Result<Vec<HistoryEntry>> {
        let map = self.namespaces.read().map_err(poisoned)?;
        Ok(map.get(ns).map(|state| state.history.clone()).unwrap_or_default())
    }

    fn list_slugs(&self, owner: &str) -> Result<Vec<String>> {
        validate_name(owner)?;
        let map = self.namespaces.read().map_err(poisoned)?;
        let mut slugs: Vec<String> = map
            .keys()
            .filter(|ns| ns.owner() == owner)
            .map(|ns| ns.slug().to_string())
            .collect();
        slugs.sort();
        Ok(slugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_crypto::ContentHasher;

    fn cid(data: &[u8]) -> Cid {
        ContentHasher::default().derive(data).unwrap()
    }

    fn ns(owner: &str, slug: &str) -> Namespace {
        Namespace::new(owner, slug).unwrap()
    }

    #[test]
    fn update_then_read_latest() {
        let store = InMemoryNamespaceStore::new();
        store.update_latest(&ns("alice", "note1"), &cid(b"1")).unwrap();
        assert_eq!(store.read_latest(&ns("alice", "note1")).unwrap(), cid(b"1"));
    }

    #[test]
    fn last_write_wins() {
        let store = InMemoryNamespaceStore::new();
        let n = ns("alice", "note1");
        store.update_latest(&n, &cid(b"1")).unwrap();
        store.update_latest(&n, &cid(b"2")).unwrap();
        assert_eq!(store.read_latest(&n).unwrap(), cid(b"2"));
    }

    #[test]
    fn never_updated_is_not_found() {
        let store = InMemoryNamespaceStore::new();
        let err = store.read_latest(&ns("alice", "missing")).unwrap_err();
        assert!(matches!(err, RefError::NotFound { .. }));
        assert!(store.read_history(&ns("alice", "missing")).unwrap().is_empty());
    }

    #[test]
    fn history_is_oldest_first() {
        let store = InMemoryNamespaceStore::new();
        let n = ns("alice", "note1");
        store.append_history(&n, &cid(b"1")).unwrap();
        store.append_history(&n, &cid(b"2")).unwrap();
        store.append_history(&n, &cid(b"1")).unwrap();
        let cids: Vec<Cid> = store.read_history(&n).unwrap().into_iter().map(|e| e.cid).collect();
        assert_eq!(cids, vec![cid(b"1"), cid(b"2"), cid(b"1")]);
    }

    #[test]
    fn history_does_not_move_latest() {
        let store = InMemoryNamespaceStore::new();
        let n = ns("alice", "note1");
        store.append_history(&n, &cid(b"1")).unwrap();
        assert!(store.latest(&n).unwrap().is_none());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = InMemoryNamespaceStore::new();
        let joined = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.namespaces.write().unwrap();
                panic!("writer died holding the lock");
            })
            .join()
        });
        assert!(joined.is_err());

        let n = ns("alice", "note1");
        assert!(matches!(store.latest(&n).unwrap_err(), RefError::Poisoned(_)));
        assert!(matches!(
            store.append_history(&n, &cid(b"1")).unwrap_err(),
            RefError::Poisoned(_)
        ));
    }

    #[test]
    fn list_slugs_per_owner() {
        let store = InMemoryNamespaceStore::new();
        store.update_latest(&ns("alice", "b"), &cid(b"1")).unwrap();
        store.update_latest(&ns("alice", "a"), &cid(b"1")).unwrap();
        store.update_latest(&ns("bob", "c"), &cid(b"1")).unwrap();
        assert_eq!(store.list_slugs("alice").unwrap(), vec!["a", "b"]);
        assert!(store.list_slugs("carol").unwrap().is_empty());
        assert!(store.list_slugs("../x").is_err());
    }
}
