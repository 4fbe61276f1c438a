use std::fs;
use std::path::{Path, PathBuf};

use cas_canon::CanonConfig;
use cas_crypto::HashAlg;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a [`Repository`](crate::Repository).
///
/// ```toml
/// root = "/var/lib/cas"
/// hash = "sha2-256"
///
/// [canon]
/// max_depth = 50
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Directory holding `objects/` and `namespaces/`.
    pub root: PathBuf,
    pub canon: CanonConfig,
    /// Digest used for newly derived identifiers.
    pub hash: HashAlg,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            canon: CanonConfig::default(),
            hash: HashAlg::default(),
        }
    }
}

impl RepositoryConfig {
    /// Config rooted at `root` with every other setting at its default.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| SdkError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
