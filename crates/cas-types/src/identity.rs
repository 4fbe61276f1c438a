use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a document author or of a requester.
///
/// Either side may be partial: a platform numeric ID, a human-readable
/// handle, both, or neither. Empty handles and the numeric ID `0` are
/// treated as absent, so a default-constructed identity is anonymous.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdentityRecord")]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
}

/// Wire form of [`Identity`], normalized on the way in.
#[derive(Deserialize)]
struct IdentityRecord {
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    id: Option<u64>,
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        let mut identity = Self::anonymous();
        if let Some(handle) = record.handle {
            identity = identity.with_handle(handle);
        }
        if let Some(id) = record.id {
            identity = identity.with_id(id);
        }
        identity
    }
}

impl Identity {
    /// Identity carrying both a handle and a numeric ID.
    pub fn new(handle: impl Into<String>, id: u64) -> Self {
        Self::anonymous().with_handle(handle).with_id(id)
    }

    /// Identity with nothing to compare.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Identity known only by handle.
    pub fn from_handle(handle: impl Into<String>) -> Self {
        Self::anonymous().with_handle(handle)
    }

    /// Identity known only by numeric ID.
    pub fn from_id(id: u64) -> Self {
        Self::anonymous().with_id(id)
    }

    /// Set the handle. Empty or whitespace-only handles are dropped.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        let handle = handle.into();
        self.handle = if handle.trim().is_empty() {
            None
        } else {
            Some(handle)
        };
        self
    }

    /// Set the numeric ID. `0` means "no ID".
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = (id != 0).then_some(id);
        self
    }

    /// The handle, if one is present.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// The numeric ID, if one is present.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id
    }

    /// Returns `true` if neither a handle nor a numeric ID is present.
    pub fn is_anonymous(&self) -> bool {
        self.handle().is_none() && self.numeric_id().is_none()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.handle(), self.numeric_id()) {
            (Some(h), Some(id)) => write!(f, "{h}#{id}"),
            (Some(h), None) => write!(f, "{h}"),
            (None, Some(id)) => write!(f, "#{id}"),
            (None, None) => write!(f, "anonymous"),
        }
    }
}
