//! Search result, analytics, and autocomplete models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xpshare_core::filter::{GeoPoint, SearchFilters, Verification};
use xpshare_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A ranked hit from a full-text experience search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExperienceSearchRow {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub location_name: Option<String>,
    pub occurred_at: Option<Timestamp>,
    pub verification_status: String,
    pub similar_count: i32,
    pub rank: f32,
    /// Highlighted excerpt; absent for filter-only searches.
    pub headline: Option<String>,
}

/// Assembled response from the search endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Analytics log row id for this execution, when logging succeeded.
    /// Clients pass it back when reporting a result click.
    pub search_id: Option<DbId>,
    pub total_count: i64,
    pub results: Vec<ExperienceSearchRow>,
    pub query_duration_ms: i64,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Flat query parameters for the keyword search endpoint.
///
/// The GET surface flattens [`SearchFilters`] into individual parameters;
/// [`SearchParams::into_filters`] reassembles them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text search query.
    pub q: Option<String>,
    /// Comma-separated list of categories.
    pub categories: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub location_name: Option<String>,
    pub radius_km: Option<f64>,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    /// Comma-separated list of tags.
    pub tags: Option<String>,
    pub solar_activity: Option<bool>,
    pub moon_full: Option<bool>,
    pub earthquake_nearby: Option<bool>,
    pub geomagnetic_storm: Option<bool>,
    pub verification: Option<Verification>,
    pub min_similar_count: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// Reassemble the structured filter object from flat parameters.
    pub fn into_filters(self) -> SearchFilters {
        let defaults = SearchFilters::default();
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint {
                lat,
                lng,
                name: self.location_name,
            }),
            _ => None,
        };

        SearchFilters {
            keywords: self.q.unwrap_or_default(),
            categories: split_csv(self.categories.as_deref()),
            location,
            radius_km: self.radius_km.unwrap_or(defaults.radius_km),
            date_from: self.date_from,
            date_to: self.date_to,
            tags: split_csv(self.tags.as_deref()),
            solar_activity: self.solar_activity.unwrap_or(false),
            moon_full: self.moon_full.unwrap_or(false),
            earthquake_nearby: self.earthquake_nearby.unwrap_or(false),
            geomagnetic_storm: self.geomagnetic_storm.unwrap_or(false),
            verification: self.verification.unwrap_or_default(),
            min_similar_count: self.min_similar_count.unwrap_or(0),
        }
    }
}

/// Split a comma-separated parameter into trimmed, non-empty values.
fn split_csv(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Query parameters for the autocomplete endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteParams {
    /// Prefix text to complete.
    pub q: String,
    /// Max suggestions.
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Autocomplete suggestions
// ---------------------------------------------------------------------------

/// A single autocomplete suggestion with its taxonomy kind.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Suggestion {
    /// One of the fixed suggestion kinds (`query`, `category`, `location`,
    /// `tag`, `recent`, `trending`); presentation-only.
    pub kind: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Search analytics
// ---------------------------------------------------------------------------

/// A row from the `search_queries` analytics log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchQueryLog {
    pub id: DbId,
    pub query_text: String,
    pub filters: serde_json::Value,
    pub result_count: Option<i32>,
    pub duration_ms: i32,
    pub clicked_result_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Database-side aggregate over the search log, one row per canonical
/// query. Mirrors the in-memory `QueryStat` shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueryStatRow {
    pub query: String,
    pub count: i64,
    pub avg_result_count: i32,
    pub click_through_rate: i32,
    pub last_searched_at: Timestamp,
}

/// A keyed observation row feeding the category/hotspot summaries.
#[derive(Debug, Clone, FromRow)]
pub struct KeySampleRow {
    pub key: String,
    pub observed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_params_reassemble_into_filters() {
        let params = SearchParams {
            q: Some("lights".to_string()),
            categories: Some("ufo, dream".to_string()),
            lat: Some(47.6),
            lng: Some(9.5),
            location_name: Some("Bodensee".to_string()),
            radius_km: Some(25.0),
            tags: Some("night,,orb ".to_string()),
            moon_full: Some(true),
            verification: Some(Verification::Verified),
            min_similar_count: Some(3),
            ..Default::default()
        };

        let filters = params.into_filters();
        assert_eq!(filters.keywords, "lights");
        assert_eq!(filters.categories, vec!["ufo", "dream"]);
        assert_eq!(filters.tags, vec!["night", "orb"]);
        assert_eq!(filters.radius_km, 25.0);
        assert!(filters.moon_full);
        assert!(!filters.solar_activity);
        assert_eq!(filters.verification, Verification::Verified);
        let loc = filters.location.unwrap();
        assert_eq!(loc.name.as_deref(), Some("Bodensee"));
    }

    #[test]
    fn location_requires_both_coordinates() {
        let params = SearchParams {
            lat: Some(47.6),
            ..Default::default()
        };
        assert!(params.into_filters().location.is_none());
    }

    #[test]
    fn missing_radius_falls_back_to_default() {
        let filters = SearchParams::default().into_filters();
        assert_eq!(filters.radius_km, SearchFilters::default().radius_km);
    }
}
