//! The [`NamespaceStore`] trait defining the namespace storage interface.

use cas_types::Cid;

use crate::error::{RefError, Result};
use crate::types::{HistoryEntry, Namespace};

/// Storage backend for namespace pointers and history.
///
/// Implementations must be thread-safe (`Send + Sync`). Pointer writes must
/// be atomic (a reader sees the old CID or the new one, never a mix), and
/// history appends must never lose or reorder earlier entries.
pub trait NamespaceStore: Send + Sync {
    /// Point the namespace at `cid`, replacing any previous value.
    fn update_latest(&self, ns: &Namespace, cid: &Cid) -> Result<()>;

    /// The namespace's current CID, or `Ok(None)` if it was never updated.
    fn latest(&self, ns: &Namespace) -> Result<Option<Cid>>;

    /// Append one record to the namespace's history.
    fn append_entry(&self, ns: &Namespace, entry: &HistoryEntry) -> Result<()>;

    /// Every history record, oldest first. Empty if none were appended.
    fn read_history(&self, ns: &Namespace) -> Result<Vec<HistoryEntry>>;

    /// Slugs that exist under `owner`, sorted.
    fn list_slugs(&self, owner: &str) -> Result<Vec<String>>;

    /// The namespace's current CID, failing with `NotFound` if unset.
    fn read_latest(&self, ns: &Namespace) -> Result<Cid> {
        self.latest(ns)?.ok_or_else(|| RefError::NotFound {
            namespace: ns.to_string(),
        })
    }

    /// Append `cid` stamped with the current time and return the record.
    fn append_history(&self, ns: &Namespace, cid: &Cid) -> Result<HistoryEntry> {
        let entry = HistoryEntry::now(*cid);
        self.append_entry(ns, &entry)?;
        Ok(entry)
    }
}
