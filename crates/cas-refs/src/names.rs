//! Owner and slug validation.
//!
//! Owners and slugs become directory names, so they must be single, safe
//! path components:
//! - Must be non-empty and at most [`MAX_NAME_LEN`] bytes
//! - Must not contain whitespace, control characters, `/`, `\`, `~`, `^`,
//!   `:`, `?`, `*`, or `[`
//! - Must not contain `..` or start with `.`

use crate::error::{RefError, Result};

/// Longest accepted owner or slug, in bytes.
pub const MAX_NAME_LEN: usize = 128;

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '~', '^', ':', '?', '*', '['];

/// Validate an owner or slug, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use cas_refs::names::validate_name;
///
/// assert!(validate_name("alice").is_ok());
/// assert!(validate_name("note-1").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("../etc").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: String| RefError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(format!("longer than {MAX_NAME_LEN} bytes")));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(format!("contains forbidden character: {ch:?}")));
    }
    if name.contains("..") {
        return Err(invalid("must not contain '..'".into()));
    }
    if name.starts_with('.') {
        return Err(invalid("must not start with '.'".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_name("alice").is_ok());
        assert!(validate_name("note1").is_ok());
        assert!(validate_name("my-post_2024.draft").is_ok());
        assert!(validate_name("ünïcode").is_ok());
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_name("").is_err());
    }

    #[test]
    fn reject_path_components() {
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a..b").is_err());
        assert!(validate_name(".hidden").is_err());
    }

    #[test]
    fn reject_whitespace_and_control() {
        assert!(validate_name("has space").is_err());
        assert!(validate_name("has\ttab").is_err());
        assert!(validate_name("nul\0byte").is_err());
    }

    #[test]
    fn reject_forbidden_chars() {
        for bad in ["a~b", "a^b", "a:b", "a?b", "a*b", "a[b"] {
            assert!(validate_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn reject_overlong_name() {
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        let err = validate_name(&"x".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert!(matches!(err, RefError::InvalidName { .. }));
    }
}
