use cas_types::{Cid, Identity};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. A second `put` under an existing
///   CID is a no-op, even if it carries an author the first did not.
/// - A reader never observes a partially written object.
/// - `delete` is unconditional; callers run the ownership gate first.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Store an object unless one already exists under `cid`.
    ///
    /// Returns `true` if this call created the object.
    fn put_object(
        &self,
        cid: &Cid,
        raw: &[u8],
        canonical: &[u8],
        author: Option<&Identity>,
    ) -> StoreResult<bool>;

    /// Read the full object. Returns `Ok(None)` if it does not exist.
    fn load(&self, cid: &Cid) -> StoreResult<Option<StoredObject>>;

    /// Check whether an object exists in the store.
    fn exists(&self, cid: &Cid) -> StoreResult<bool>;

    /// Delete an object. Returns `true` if the object existed.
    fn delete(&self, cid: &Cid) -> StoreResult<bool>;

    /// Store an object without an author record.
    fn put(&self, cid: &Cid, raw: &[u8], canonical: &[u8]) -> StoreResult<bool> {
        self.put_object(cid, raw, canonical, None)
    }

    /// Store an object together with its author.
    fn put_with_author(
        &self,
        cid: &Cid,
        raw: &[u8],
        canonical: &[u8],
        author: &Identity,
    ) -> StoreResult<bool> {
        self.put_object(cid, raw, canonical, Some(author))
    }

    /// Raw bytes of an object.
    fn get(&self, cid: &Cid) -> StoreResult<Vec<u8>> {
        self.load(cid)?
            .map(|obj| obj.raw)
            .ok_or(StoreError::NotFound(*cid))
    }

    /// Canonical bytes of an object.
    fn get_canonical(&self, cid: &Cid) -> StoreResult<Vec<u8>> {
        self.load(cid)?
            .map(|obj| obj.canonical)
            .ok_or(StoreError::NotFound(*cid))
    }

    /// Recorded author of an object.
    ///
    /// Fails with `NotFound` if the object is absent and `AuthorNotFound`
    /// if it exists without an author record.
    fn get_author(&self, cid: &Cid) -> StoreResult<Identity> {
        let obj = self.load(cid)?.ok_or(StoreError::NotFound(*cid))?;
        obj.author.ok_or(StoreError::AuthorNotFound(*cid))
    }
}
