//! Controlled-vocabulary suggestion workflow.
//!
//! Admins curate a canonical attribute/value schema; users submit free-text
//! values that wait in a review queue. The status machine is deliberately
//! small: `pending_review` is the only state with outgoing edges, every
//! transition is a single admin action, and there is no rollback.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length for attribute names and vocabulary values.
pub const MAX_VALUE_CHARS: usize = 100;

/// Review status of a user-submitted vocabulary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    PendingReview,
    /// Promoted into the canonical schema as a new value.
    Approved,
    Rejected,
    /// Folded into an existing canonical value.
    Merged,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::PendingReview => "pending_review",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Merged => "merged",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_review" => Ok(SuggestionStatus::PendingReview),
            "approved" => Ok(SuggestionStatus::Approved),
            "rejected" => Ok(SuggestionStatus::Rejected),
            "merged" => Ok(SuggestionStatus::Merged),
            other => Err(CoreError::Validation(format!(
                "unknown suggestion status '{other}'"
            ))),
        }
    }
}

/// Whether `from -> to` is a legal review transition.
pub fn can_transition(from: SuggestionStatus, to: SuggestionStatus) -> bool {
    matches!(
        (from, to),
        (
            SuggestionStatus::PendingReview,
            SuggestionStatus::Approved
                | SuggestionStatus::Rejected
                | SuggestionStatus::Merged
        )
    )
}

/// [`can_transition`] as a result, with a reviewable error message.
pub fn check_transition(from: SuggestionStatus, to: SuggestionStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "suggestion is '{}', cannot move to '{}'",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// Validate an attribute name or vocabulary value: non-blank, bounded length.
pub fn validate_term(term: &str) -> Result<(), CoreError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("value must not be blank".to_string()));
    }
    if trimmed.chars().count() > MAX_VALUE_CHARS {
        return Err(CoreError::Validation(format!(
            "value exceeds {MAX_VALUE_CHARS} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pending_review_can_go_anywhere() {
        for to in [
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
            SuggestionStatus::Merged,
        ] {
            assert!(can_transition(SuggestionStatus::PendingReview, to));
        }
    }

    #[test]
    fn settled_states_are_terminal() {
        for from in [
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
            SuggestionStatus::Merged,
        ] {
            for to in [
                SuggestionStatus::PendingReview,
                SuggestionStatus::Approved,
                SuggestionStatus::Rejected,
                SuggestionStatus::Merged,
            ] {
                assert!(!can_transition(from, to));
            }
        }
    }

    #[test]
    fn illegal_transition_is_a_conflict() {
        assert_matches!(
            check_transition(SuggestionStatus::Rejected, SuggestionStatus::Approved),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn status_round_trips_through_strings() {
        for s in [
            SuggestionStatus::PendingReview,
            SuggestionStatus::Approved,
            SuggestionStatus::Rejected,
            SuggestionStatus::Merged,
        ] {
            assert_eq!(s.as_str().parse::<SuggestionStatus>().unwrap(), s);
        }
    }

    #[test]
    fn blank_and_oversized_terms_are_rejected() {
        assert_matches!(validate_term("   "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_term(&"x".repeat(MAX_VALUE_CHARS + 1)),
            Err(CoreError::Validation(_))
        );
        assert!(validate_term("triangular craft").is_ok());
    }
}
