use cas_types::Identity;

use crate::strategy::{MatchOutcome, MatchStrategy};

/// Compares platform numeric IDs.
///
/// Decisive only when both sides carry one. Numeric IDs are stable across
/// handle renames, so this strategy runs first.
pub struct NumericIdMatch;

impl MatchStrategy for NumericIdMatch {
    fn name(&self) -> &str {
        "numeric-id"
    }

    fn evaluate(&self, stored: &Identity, requester: &Identity) -> MatchOutcome {
        match (stored.numeric_id(), requester.numeric_id()) {
            (Some(a), Some(b)) if a == b => MatchOutcome::Matched,
            (Some(_), Some(_)) => MatchOutcome::Mismatched,
            _ => MatchOutcome::Indeterminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ids_match() {
        let outcome = NumericIdMatch.evaluate(&Identity::from_id(123), &Identity::from_id(123));
        assert_eq!(outcome, MatchOutcome::Matched);
    }

    #[test]
    fn different_ids_mismatch_regardless_of_handle() {
        let outcome =
            NumericIdMatch.evaluate(&Identity::new("alice", 123), &Identity::new("alice", 456));
        assert_eq!(outcome, MatchOutcome::Mismatched);
    }

    #[test]
    fn missing_id_is_indeterminate() {
        let outcome =
            NumericIdMatch.evaluate(&Identity::new("alice", 123), &Identity::from_handle("alice"));
        assert_eq!(outcome, MatchOutcome::Indeterminate);
        let outcome = NumericIdMatch.evaluate(&Identity::anonymous(), &Identity::from_id(1));
        assert_eq!(outcome, MatchOutcome::Indeterminate);
    }
}
