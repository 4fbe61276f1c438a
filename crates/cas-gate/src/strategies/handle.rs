use cas_types::Identity;

use crate::strategy::{MatchOutcome, MatchStrategy};

/// Compares human-readable handles.
///
/// A leading `@` is ignored and the comparison is ASCII case-insensitive,
/// so `@Alice` and `alice` are the same handle.
pub struct HandleMatch;

fn normalize(handle: &str) -> &str {
    let trimmed = handle.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

impl MatchStrategy for HandleMatch {
    fn name(&self) -> &str {
        "handle"
    }

    fn evaluate(&self, stored: &Identity, requester: &Identity) -> MatchOutcome {
        let (Some(a), Some(b)) = (stored.handle(), requester.handle()) else {
            return MatchOutcome::Indeterminate;
        };
        let (a, b) = (normalize(a), normalize(b));
        if a.is_empty() || b.is_empty() {
            MatchOutcome::Indeterminate
        } else if a.eq_ignore_ascii_case(b) {
            MatchOutcome::Matched
        } else {
            MatchOutcome::Mismatched
        }
    }
}
