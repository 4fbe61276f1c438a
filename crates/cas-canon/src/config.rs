use serde::{Deserialize, Serialize};

/// Limits and conventions applied by the [`Canonicalizer`](crate::Canonicalizer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonConfig {
    /// Maximum number of nested containers (the root object counts as 1).
    ///
    /// Applies in full to documents built in memory. Raw JSON text is also
    /// bounded by `serde_json`'s fixed recursion limit of 128 levels, so text
    /// nested deeper than that fails with a parse error whatever this value is.
    pub max_depth: usize,
    /// Maximum size of raw JSON input accepted by `parse`.
    pub max_document_bytes: usize,
    /// Reserved field that names the document's schema context.
    pub context_field: String,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            max_depth: 50,
            max_document_bytes: 1024 * 1024,
            context_field: "@context".into(),
        }
    }
}
