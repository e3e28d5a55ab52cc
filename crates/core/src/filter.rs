//! Search filter model.
//!
//! [`SearchFilters`] is the value object the whole search pipeline moves
//! around: the API deserializes it from requests, the repository layer turns
//! it into SQL predicates, saved searches persist it as `jsonb`, and the
//! preset store snapshots it client-side. One instance is immutable per
//! search invocation; the UI mutates a draft one field at a time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default search radius around a location filter, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Minimum trimmed keyword length before NLP search may be invoked.
pub const MIN_NLP_QUERY_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Component types
// ---------------------------------------------------------------------------

/// A geographic point with an optional display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
}

/// Verification status filter for experiences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    /// No verification filtering.
    #[default]
    All,
    Verified,
    Unverified,
}

impl Verification {
    /// The database column value this filter matches, or `None` for no filter.
    pub fn as_column_value(&self) -> Option<&'static str> {
        match self {
            Verification::All => None,
            Verification::Verified => Some("verified"),
            Verification::Unverified => Some("unverified"),
        }
    }
}

/// Boolean operators the query builder can splice into the keyword field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOperator {
    And,
    Or,
    Not,
}

impl BoolOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOperator::And => "AND",
            BoolOperator::Or => "OR",
            BoolOperator::Not => "NOT",
        }
    }
}

// ---------------------------------------------------------------------------
// SearchFilters
// ---------------------------------------------------------------------------

/// Structured filter set for an experience search.
///
/// Serde-round-trips as the `filters` jsonb column of a saved search, so
/// every field has a default and unknown fields are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Free-text keywords. Boolean operators live in here as literal text
    /// (see [`SearchFilters::append_operator`]).
    pub keywords: String,
    /// Experience categories to include (empty = all).
    pub categories: Vec<String>,
    /// Optional centre point for radius filtering.
    pub location: Option<GeoPoint>,
    /// Radius around `location` in kilometres. Ignored without a location.
    pub radius_km: f64,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    /// Tags to match (any-overlap semantics).
    pub tags: Vec<String>,
    /// External-event flags. Each restricts results to experiences recorded
    /// during the named condition; they are independent of one another.
    pub solar_activity: bool,
    pub moon_full: bool,
    pub earthquake_nearby: bool,
    pub geomagnetic_storm: bool,
    pub verification: Verification,
    /// Only experiences with at least this many similar reports.
    pub min_similar_count: i32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            categories: Vec::new(),
            location: None,
            radius_km: DEFAULT_RADIUS_KM,
            date_from: None,
            date_to: None,
            tags: Vec::new(),
            solar_activity: false,
            moon_full: false,
            earthquake_nearby: false,
            geomagnetic_storm: false,
            verification: Verification::All,
            min_similar_count: 0,
        }
    }
}

impl SearchFilters {
    /// Splice a boolean operator into the keyword text.
    ///
    /// This is literal text concatenation, not query-language parsing: the
    /// operator is appended as a substring and later sanitized into the
    /// tsquery like any other term. Structural enforcement of operators is
    /// a known limitation carried over from the query-builder UI.
    pub fn append_operator(&mut self, op: BoolOperator) {
        if !self.keywords.is_empty() && !self.keywords.ends_with(' ') {
            self.keywords.push(' ');
        }
        self.keywords.push_str(op.as_str());
        self.keywords.push(' ');
    }

    /// Check the filter invariants: non-negative radius and similar-count,
    /// ordered date range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.radius_km < 0.0 {
            return Err(CoreError::Validation(format!(
                "radius_km must be >= 0, got {}",
                self.radius_km
            )));
        }
        if self.min_similar_count < 0 {
            return Err(CoreError::Validation(format!(
                "min_similar_count must be >= 0, got {}",
                self.min_similar_count
            )));
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::Validation(
                    "date_from must not be after date_to".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The trimmed keyword text, if it meets the NLP minimum length.
    ///
    /// NLP search refuses queries shorter than [`MIN_NLP_QUERY_CHARS`]
    /// characters; keyword search has no such gate.
    pub fn nlp_query(&self) -> Result<&str, CoreError> {
        let q = self.keywords.trim();
        if q.chars().count() < MIN_NLP_QUERY_CHARS {
            return Err(CoreError::Validation(format!(
                "NLP search requires at least {MIN_NLP_QUERY_CHARS} characters"
            )));
        }
        Ok(q)
    }

    /// Whether any filter beyond the defaults is set.
    pub fn is_empty(&self) -> bool {
        *self == SearchFilters::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_have_standard_radius() {
        let f = SearchFilters::default();
        assert_eq!(f.radius_km, DEFAULT_RADIUS_KM);
        assert!(f.is_empty());
    }

    #[test]
    fn append_operator_splices_text() {
        let mut f = SearchFilters {
            keywords: "lights".to_string(),
            ..Default::default()
        };
        f.append_operator(BoolOperator::And);
        f.keywords.push_str("triangle");
        assert_eq!(f.keywords, "lights AND triangle");
    }

    #[test]
    fn append_operator_on_empty_keywords() {
        let mut f = SearchFilters::default();
        f.append_operator(BoolOperator::Not);
        assert_eq!(f.keywords, "NOT ");
    }

    #[test]
    fn negative_radius_is_rejected() {
        let f = SearchFilters {
            radius_km: -1.0,
            ..Default::default()
        };
        assert_matches!(f.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let f = SearchFilters {
            date_from: Some(chrono::Utc::now()),
            date_to: Some(chrono::Utc::now() - chrono::Duration::days(1)),
            ..Default::default()
        };
        assert_matches!(f.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn nlp_query_requires_three_chars() {
        let f = SearchFilters {
            keywords: "  uf ".to_string(),
            ..Default::default()
        };
        assert_matches!(f.nlp_query(), Err(CoreError::Validation(_)));

        let f = SearchFilters {
            keywords: " ufo ".to_string(),
            ..Default::default()
        };
        assert_eq!(f.nlp_query().unwrap(), "ufo");
    }

    #[test]
    fn filters_round_trip_through_json() {
        let f = SearchFilters {
            keywords: "orb".to_string(),
            categories: vec!["ufo".to_string()],
            location: Some(GeoPoint {
                lat: 47.6,
                lng: 9.5,
                name: Some("Bodensee".to_string()),
            }),
            moon_full: true,
            verification: Verification::Verified,
            min_similar_count: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&f).unwrap();
        let back: SearchFilters = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn unknown_fields_are_ignored_on_decode() {
        let json = serde_json::json!({ "keywords": "ghost", "legacy_field": 1 });
        let f: SearchFilters = serde_json::from_value(json).unwrap();
        assert_eq!(f.keywords, "ghost");
    }
}
