//! Deterministic canonicalization of structured documents.
//!
//! Every document stored in CAS is first reduced to a single canonical byte
//! sequence. Two documents that differ only in key order or whitespace
//! canonicalize to identical bytes, and re-canonicalizing canonical output is
//! a no-op. Content identifiers are derived from these bytes, so this crate
//! is the root of the whole addressing scheme.
//!
//! # Canonical form
//!
//! - Object keys sorted by UTF-8 byte order at every level
//! - Array order preserved
//! - No insignificant whitespace
//! - Integral floats below 2^53 written as integers, other floats in shortest
//!   round-trip form
//! - Strings escaped with JSON rules, non-ASCII passed through as UTF-8
//!
//! # Validation
//!
//! Before any bytes are produced the [`Canonicalizer`] checks, without
//! recursion, that the document is an object carrying the schema-context
//! field, that nesting stays within [`CanonConfig::max_depth`], and that no
//! key contains a control character.
//!
//! ```rust
//! use cas_canon::Canonicalizer;
//!
//! let canon = Canonicalizer::default();
//! let a = canon.canonicalize_json(br#"{"b": 2, "@context": "x", "a": 1}"#).unwrap();
//! let b = canon.canonicalize_json(br#"{"a":1,"@context":"x","b":2}"#).unwrap();
//! assert_eq!(a.form, b.form);
//! assert_eq!(a.form.as_str(), r#"{"@context":"x","a":1,"b":2}"#);
//! ```

pub mod canonicalizer;
pub mod config;
pub mod document;
pub mod error;

pub use canonicalizer::{canonicalize, CanonicalForm, Canonicalized, Canonicalizer};
pub use config::CanonConfig;
pub use document::Document;
pub use error::{CanonResult, ValidationError};
