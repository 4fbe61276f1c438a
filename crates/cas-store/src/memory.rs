use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cas_types::{Cid, Identity};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock` for safe concurrent access. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<Cid, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    /// Return a sorted list of all CIDs in the store.
    pub fn all_cids(&self) -> StoreResult<Vec<Cid>> {
        let mut cids: Vec<Cid> = self.read_map()?.keys().copied().collect();
        cids.sort();
        Ok(cids)
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Cid, StoredObject>>> {
        self.objects
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Cid, StoredObject>>> {
        self.objects
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put_object(
        &self,
        cid: &Cid,
        raw: &[u8],
        canonical: &[u8],
        author: Option<&Identity>,
    ) -> StoreResult<bool> {
        let mut map = self.write_map()?;
        if map.contains_key(cid) {
            return Ok(false);
        }
        map.insert(
            *cid,
            StoredObject::new(*cid, raw.to_vec(), canonical.to_vec(), author.cloned()),
        );
        Ok(true)
    }

    fn load(&self, cid: &Cid) -> StoreResult<Option<StoredObject>> {
        Ok(self.read_map()?.get(cid).cloned())
    }

    fn exists(&self, cid: &Cid) -> StoreResult<bool> {
        Ok(self.read_map()?.contains_key(cid))
    }

    fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        Ok(self.write_map()?.remove(cid).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read_map().map(|m| m.len()).unwrap_or_default();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}
