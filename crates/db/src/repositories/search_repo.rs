//! Repository for experience search, autocomplete, and analytics logging.
//!
//! Every filter in [`SearchFilters`] becomes a SQL predicate here; optional
//! filters use the `($n::TYPE IS NULL OR ...)` bind pattern so one prepared
//! statement covers all combinations. Grouping for analytics happens either
//! in `AnalyticsRepo` (SQL) or in `xpshare_core::analytics` (in-memory fold
//! over a bounded window) -- never over an unbounded client-side set.

use sqlx::PgPool;
use xpshare_core::filter::SearchFilters;
use xpshare_core::search::{
    build_prefix_tsquery, build_tsquery, clamp_limit, clamp_offset, SuggestionKind,
    DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_SEARCH_LIMIT, MAX_AUTOCOMPLETE_LIMIT, MAX_SEARCH_LIMIT,
};
use xpshare_core::types::DbId;

use crate::models::search::{ExperienceSearchRow, Suggestion};

/// Mean Earth radius in kilometres, for the haversine distance predicate.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Provides search operations over published experiences.
pub struct SearchRepo;

impl SearchRepo {
    // -----------------------------------------------------------------------
    // Filtered full-text search
    // -----------------------------------------------------------------------

    /// Execute a filtered search over published experiences.
    ///
    /// Keywords are optional: without them the query degrades to a ranked
    /// listing under the remaining filters (rank 0, no headline). Location
    /// filtering uses a haversine great-circle distance against the filter's
    /// radius.
    pub async fn search(
        pool: &PgPool,
        filters: &SearchFilters,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ExperienceSearchRow>, sqlx::Error> {
        let tsquery = build_tsquery(&filters.keywords);

        let categories = if filters.categories.is_empty() {
            None
        } else {
            Some(filters.categories.clone())
        };
        let tags = if filters.tags.is_empty() {
            None
        } else {
            Some(filters.tags.clone())
        };
        let (lat, lng) = match &filters.location {
            Some(p) => (Some(p.lat), Some(p.lng)),
            None => (None, None),
        };

        let limit = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let offset = clamp_offset(offset);

        let sql = format!(
            "SELECT id, title, category, location_name, occurred_at, \
                    verification_status, similar_count, \
                    COALESCE(ts_rank(search_vector, to_tsquery('english', $1)), 0)::REAL AS rank, \
                    CASE WHEN $1::TEXT IS NULL THEN NULL \
                         ELSE ts_headline('english', title || ' ' || body, \
                                          to_tsquery('english', $1), \
                                          'MaxWords=40, MinWords=10') \
                    END AS headline \
             FROM experiences \
             WHERE status = 'published' \
               AND ($1::TEXT IS NULL OR search_vector @@ to_tsquery('english', $1)) \
               AND ($2::TEXT[] IS NULL OR category = ANY($2)) \
               AND ($3::TEXT[] IS NULL OR tags && $3) \
               AND ($4::TIMESTAMPTZ IS NULL OR occurred_at >= $4) \
               AND ($5::TIMESTAMPTZ IS NULL OR occurred_at <= $5) \
               AND (NOT $6::BOOLEAN OR solar_activity) \
               AND (NOT $7::BOOLEAN OR moon_full) \
               AND (NOT $8::BOOLEAN OR earthquake_nearby) \
               AND (NOT $9::BOOLEAN OR geomagnetic_storm) \
               AND ($10::TEXT IS NULL OR verification_status = $10) \
               AND similar_count >= $11 \
               AND ($12::DOUBLE PRECISION IS NULL OR ( \
                   latitude IS NOT NULL AND longitude IS NOT NULL \
                   AND {EARTH_RADIUS_KM} * acos(LEAST(1.0, \
                       cos(radians($12)) * cos(radians(latitude)) \
                       * cos(radians(longitude) - radians($13)) \
                       + sin(radians($12)) * sin(radians(latitude)))) <= $14 \
               )) \
             ORDER BY rank DESC, created_at DESC \
             LIMIT $15 OFFSET $16"
        );

        sqlx::query_as::<_, ExperienceSearchRow>(&sql)
            .bind(&tsquery)
            .bind(&categories)
            .bind(&tags)
            .bind(filters.date_from)
            .bind(filters.date_to)
            .bind(filters.solar_activity)
            .bind(filters.moon_full)
            .bind(filters.earthquake_nearby)
            .bind(filters.geomagnetic_storm)
            .bind(filters.verification.as_column_value())
            .bind(filters.min_similar_count)
            .bind(lat)
            .bind(lng)
            .bind(filters.radius_km)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Autocomplete
    // -----------------------------------------------------------------------

    /// Prefix suggestions for search-as-you-type, tagged with their kind.
    ///
    /// Draws from experience titles (full-text prefix match), categories,
    /// location names, canonical vocabulary values, and the recent and
    /// trending slices of the query log. Kinds only drive presentation.
    pub async fn autocomplete(
        pool: &PgPool,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Suggestion>, sqlx::Error> {
        let prefix_query = match build_prefix_tsquery(query) {
            Some(q) => q,
            None => return Ok(Vec::new()),
        };
        let pattern = ilike_prefix(query);
        let limit = clamp_limit(limit, DEFAULT_AUTOCOMPLETE_LIMIT, MAX_AUTOCOMPLETE_LIMIT);

        let sql = format!(
            "SELECT kind, value FROM ( \
                SELECT '{query}'::TEXT AS kind, title AS value, \
                       ts_rank(search_vector, to_tsquery('english', $1)) AS rank \
                FROM experiences \
                WHERE status = 'published' \
                  AND search_vector @@ to_tsquery('english', $1) \
                UNION ALL \
                SELECT DISTINCT '{category}'::TEXT, category, 0.5::REAL \
                FROM experiences \
                WHERE status = 'published' AND category ILIKE $2 \
                UNION ALL \
                SELECT DISTINCT '{location}'::TEXT, location_name, 0.4::REAL \
                FROM experiences \
                WHERE status = 'published' AND location_name ILIKE $2 \
                UNION ALL \
                SELECT DISTINCT '{tag}'::TEXT, value, 0.3::REAL \
                FROM attribute_schema \
                WHERE value ILIKE $2 \
                UNION ALL \
                SELECT DISTINCT '{recent}'::TEXT, query_text, 0.2::REAL \
                FROM search_queries \
                WHERE query_text ILIKE $2 \
                  AND created_at > NOW() - INTERVAL '7 days' \
                UNION ALL \
                SELECT '{trending}'::TEXT, query_text, \
                       (0.1 + LEAST(COUNT(*), 50)::REAL / 100)::REAL \
                FROM search_queries \
                WHERE query_text ILIKE $2 \
                  AND created_at > NOW() - INTERVAL '30 days' \
                GROUP BY query_text \
                HAVING COUNT(*) >= 3 \
            ) sub \
            WHERE value IS NOT NULL \
            ORDER BY rank DESC, value ASC \
            LIMIT $3",
            query = SuggestionKind::Query.as_str(),
            category = SuggestionKind::Category.as_str(),
            location = SuggestionKind::Location.as_str(),
            tag = SuggestionKind::Tag.as_str(),
            recent = SuggestionKind::Recent.as_str(),
            trending = SuggestionKind::Trending.as_str(),
        );

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(&prefix_query)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Analytics logging
    // -----------------------------------------------------------------------

    /// Log one executed search, returning the log row id.
    pub async fn log_search_query(
        pool: &PgPool,
        query_text: &str,
        filters: &serde_json::Value,
        result_count: i32,
        duration_ms: i32,
        user_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO search_queries \
                 (query_text, filters, result_count, duration_ms, user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(query_text)
        .bind(filters)
        .bind(result_count)
        .bind(duration_ms)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Record that a search led to a result click.
    ///
    /// Returns `false` when the log row does not exist (e.g. logging failed
    /// for the original search).
    pub async fn record_click(
        pool: &PgPool,
        search_id: DbId,
        result_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE search_queries SET clicked_result_id = $2 WHERE id = $1",
        )
        .bind(search_id)
        .bind(result_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `value%` ILIKE pattern, escaping the wildcard characters in the
/// user's text.
fn ilike_prefix(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ilike_prefix_escapes_wildcards() {
        assert_eq!(ilike_prefix("bode"), "bode%");
        assert_eq!(ilike_prefix(" 50%_x "), "50\\%\\_x%");
        assert_eq!(ilike_prefix("a\\b"), "a\\\\b%");
    }
}
