use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Multicodec tag for plain JSON payloads.
pub const JSON_CODEC: u64 = 0x0200;

/// Self-describing content identifier for a stored document.
///
/// A `Cid` is a CIDv1 (`version ‖ content-type ‖ multihash`) rendered in
/// multibase base32-lower, so the text always starts with `b`. Only the
/// canonical text form is accepted: the same binary CID can never appear
/// under two different strings, which makes the text safe to use as a
/// storage key and file name.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid {
    inner: cid::Cid,
}

impl Cid {
    /// Parse and validate a CID string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let inner = cid::Cid::try_from(s).map_err(|e| TypeError::InvalidCid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        if inner.version() != cid::Version::V1 {
            return Err(TypeError::UnsupportedVersion(s.to_string()));
        }
        let expected = inner.to_string();
        if expected != s {
            return Err(TypeError::NonCanonical {
                input: s.to_string(),
                expected,
            });
        }
        Ok(Self { inner })
    }

    /// Wrap an already-built CIDv1.
    pub fn from_raw(inner: cid::Cid) -> Result<Self, TypeError> {
        if inner.version() != cid::Version::V1 {
            return Err(TypeError::UnsupportedVersion(inner.to_string()));
        }
        Ok(Self { inner })
    }

    /// The underlying binary CID.
    pub fn as_raw(&self) -> &cid::Cid {
        &self.inner
    }

    /// Content-type (multicodec) tag.
    pub fn codec(&self) -> u64 {
        self.inner.codec()
    }

    /// Multihash function code (e.g. `0x12` for SHA2-256).
    pub fn hash_code(&self) -> u64 {
        self.inner.hash().code()
    }

    /// Raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        self.inner.hash().digest()
    }

    /// Hex-encoded digest.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }

    /// Binary form: `version ‖ codec ‖ hash code ‖ digest length ‖ digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes()
    }

    /// Short form for logs: the trailing 10 characters of the text.
    pub fn short(&self) -> String {
        let text = self.inner.to_string();
        let start = text.len().saturating_sub(10);
        format!("…{}", &text[start..])
    }
}

impl PartialEq for Cid {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Cid {}

impl Hash for Cid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl PartialOrd for Cid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.short())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for Cid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cid {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.to_string()
    }
}
