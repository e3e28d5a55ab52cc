//! Search constants and query-text helpers.
//!
//! Lives in `core` (zero internal deps) so the repository layer, the API,
//! and the alert scheduler all share one definition of how user text
//! becomes a PostgreSQL `tsquery` and how result windows are bounded.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination and view limits
// ---------------------------------------------------------------------------

/// Default number of search results per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Default number of autocomplete suggestions.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: i64 = 10;

/// Maximum number of autocomplete suggestions.
pub const MAX_AUTOCOMPLETE_LIMIT: i64 = 25;

/// Minimum query length before autocomplete touches the database.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

/// Popular-queries analytics view size.
pub const POPULAR_QUERIES_LIMIT: usize = 20;

/// Zero-result-queries analytics view size.
pub const ZERO_RESULT_QUERIES_LIMIT: usize = 15;

/// Category and location-hotspot analytics view size.
pub const KEY_SUMMARY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Suggestion taxonomy
// ---------------------------------------------------------------------------

/// Fixed taxonomy for autocomplete suggestions.
///
/// The kind only drives presentation (icon/colour grouping) on the client;
/// it plays no part in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Query,
    Category,
    Location,
    Tag,
    Recent,
    Trending,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Query => "query",
            SuggestionKind::Category => "category",
            SuggestionKind::Location => "location",
            SuggestionKind::Tag => "tag",
            SuggestionKind::Recent => "recent",
            SuggestionKind::Trending => "trending",
        }
    }
}

// ---------------------------------------------------------------------------
// Query text helpers
// ---------------------------------------------------------------------------

/// Sanitize user input into terms usable in a tsquery.
///
/// Splits on whitespace, strips characters that would break tsquery parsing
/// (everything non-alphanumeric except `_`), and drops empty leftovers.
/// Spliced boolean operator words (`AND`, `OR`, `NOT`) survive as plain
/// terms, which matches how the original query builder treated them.
fn sanitize_terms(query: &str) -> Option<Vec<&str>> {
    let terms: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Convert user input into a PostgreSQL `tsquery` string (terms AND-joined).
///
/// # Examples
///
/// ```
/// use xpshare_core::search::build_tsquery;
/// assert_eq!(build_tsquery("strange lights"), Some("strange & lights".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    sanitize_terms(query).map(|terms| terms.join(" & "))
}

/// Build a prefix tsquery for autocomplete: the last term matches as a
/// prefix, earlier terms match exactly.
///
/// # Examples
///
/// ```
/// use xpshare_core::search::build_prefix_tsquery;
/// assert_eq!(build_prefix_tsquery("bode"), Some("bode:*".to_string()));
/// assert_eq!(build_prefix_tsquery("lake bode"), Some("lake & bode:*".to_string()));
/// ```
pub fn build_prefix_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query)?;

    if terms.len() == 1 {
        return Some(format!("{}:*", terms[0]));
    }

    let exact = &terms[..terms.len() - 1];
    let prefix = terms[terms.len() - 1];
    Some(format!("{} & {}:*", exact.join(" & "), prefix))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsquery_joins_terms_with_and() {
        assert_eq!(
            build_tsquery("strange lights"),
            Some("strange & lights".to_string())
        );
    }

    #[test]
    fn tsquery_strips_special_characters() {
        assert_eq!(
            build_tsquery("lights! (triangle)"),
            Some("lights & triangle".to_string())
        );
    }

    #[test]
    fn tsquery_keeps_spliced_operators_as_terms() {
        assert_eq!(
            build_tsquery("lights AND triangle"),
            Some("lights & AND & triangle".to_string())
        );
    }

    #[test]
    fn tsquery_empty_and_whitespace_return_none() {
        assert_eq!(build_tsquery(""), None);
        assert_eq!(build_tsquery("   "), None);
        assert_eq!(build_tsquery("!?!"), None);
    }

    #[test]
    fn prefix_query_single_term() {
        assert_eq!(build_prefix_tsquery("bode"), Some("bode:*".to_string()));
    }

    #[test]
    fn prefix_query_multiple_terms() {
        assert_eq!(
            build_prefix_tsquery("lake bode"),
            Some("lake & bode:*".to_string())
        );
    }

    #[test]
    fn prefix_query_empty_returns_none() {
        assert_eq!(build_prefix_tsquery(""), None);
    }

    #[test]
    fn clamp_limit_bounds() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(-3), 20, 100), 1);
        assert_eq!(clamp_limit(Some(42), 20, 100), 42);
    }

    #[test]
    fn clamp_offset_bounds() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn suggestion_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SuggestionKind::Trending).unwrap(),
            "\"trending\""
        );
        assert_eq!(SuggestionKind::Location.as_str(), "location");
    }
}
