use cas_types::{Cid, Identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document: both byte forms plus metadata.
///
/// `StoredObject` is the unit of storage. Its content never changes after the
/// first successful `put` under its CID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// Identifier derived from `canonical`.
    pub cid: Cid,
    /// The document bytes exactly as submitted.
    pub raw: Vec<u8>,
    /// The canonical bytes the CID was derived from.
    pub canonical: Vec<u8>,
    /// Who saved the object, if recorded.
    pub author: Option<Identity>,
    /// When the object was first stored.
    pub created_at: DateTime<Utc>,
}

impl StoredObject {
    /// Build an object stamped with the current time.
    pub fn new(cid: Cid, raw: Vec<u8>, canonical: Vec<u8>, author: Option<Identity>) -> Self {
        Self {
            cid,
            raw,
            canonical,
            author,
            created_at: Utc::now(),
        }
    }

    /// Metadata sidecar for this object.
    pub fn meta(&self) -> ObjectMeta {
        ObjectMeta {
            created_at: self.created_at,
            author: self.author.clone(),
        }
    }

    /// Total bytes held (raw plus canonical).
    pub fn size(&self) -> u64 {
        (self.raw.len() + self.canonical.len()) as u64
    }
}

/// Metadata persisted next to an object's bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Identity>,
}
