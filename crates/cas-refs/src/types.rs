//! Core namespace types.

use std::fmt;

use cas_types::Cid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::names::validate_name;

/// A validated `(owner, slug)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    owner: String,
    slug: String,
}

impl Namespace {
    /// Validate both components and build the namespace.
    pub fn new(owner: impl Into<String>, slug: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let slug = slug.into();
        validate_name(&owner)?;
        validate_name(&slug)?;
        Ok(Self { owner, slug })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

/// One record of a namespace's history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub cid: Cid,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(cid: Cid, timestamp: DateTime<Utc>) -> Self {
        Self { cid, timestamp }
    }

    /// Entry stamped with the current time.
    pub fn now(cid: Cid) -> Self {
        Self::new(cid, Utc::now())
    }
}
