//! Repository for search-analytics reads.
//!
//! The high-volume popular-queries view aggregates in SQL; the remaining
//! views hand a bounded recent window to the in-memory fold in
//! `xpshare_core::analytics`.

use sqlx::PgPool;

use crate::models::search::{KeySampleRow, QueryStatRow, SearchQueryLog};

const LOG_COLUMNS: &str = "\
    id, query_text, filters, result_count, duration_ms, \
    clicked_result_id, user_id, created_at";

/// Provides read operations over the `search_queries` log and experience
/// summaries.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Fetch the most recent log rows inside a day window, newest first.
    ///
    /// `max_rows` caps the transfer so the in-memory fold stays cheap.
    pub async fn recent_query_log(
        pool: &PgPool,
        window_days: i32,
        max_rows: i64,
    ) -> Result<Vec<SearchQueryLog>, sqlx::Error> {
        let query = format!(
            "SELECT {LOG_COLUMNS} FROM search_queries \
             WHERE created_at > NOW() - make_interval(days => $1) \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, SearchQueryLog>(&query)
            .bind(window_days)
            .bind(max_rows)
            .fetch_all(pool)
            .await
    }

    /// Per-query aggregate over the whole log, grouped database-side.
    ///
    /// Matches the in-memory `QueryStat` semantics: canonical key is
    /// trimmed + lower-cased, the average result count rounds to the
    /// nearest integer (0 when no counts were recorded), and CTR is the
    /// rounded click percentage.
    pub async fn popular_queries(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<QueryStatRow>, sqlx::Error> {
        sqlx::query_as::<_, QueryStatRow>(
            "SELECT LOWER(TRIM(query_text)) AS query, \
                    COUNT(*)::BIGINT AS count, \
                    COALESCE(ROUND(AVG(result_count))::INT, 0) AS avg_result_count, \
                    ROUND(COUNT(clicked_result_id)::NUMERIC * 100 / COUNT(*))::INT \
                        AS click_through_rate, \
                    MAX(created_at) AS last_searched_at \
             FROM search_queries \
             WHERE TRIM(query_text) <> '' \
             GROUP BY LOWER(TRIM(query_text)) \
             ORDER BY count DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Category observations for published experiences in a day window.
    pub async fn recent_categories(
        pool: &PgPool,
        window_days: i32,
        max_rows: i64,
    ) -> Result<Vec<KeySampleRow>, sqlx::Error> {
        sqlx::query_as::<_, KeySampleRow>(
            "SELECT category AS key, created_at AS observed_at \
             FROM experiences \
             WHERE status = 'published' \
               AND created_at > NOW() - make_interval(days => $1) \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(window_days)
        .bind(max_rows)
        .fetch_all(pool)
        .await
    }

    /// Location-name observations for published experiences in a day window.
    pub async fn recent_hotspots(
        pool: &PgPool,
        window_days: i32,
        max_rows: i64,
    ) -> Result<Vec<KeySampleRow>, sqlx::Error> {
        sqlx::query_as::<_, KeySampleRow>(
            "SELECT location_name AS key, created_at AS observed_at \
             FROM experiences \
             WHERE status = 'published' \
               AND location_name IS NOT NULL \
               AND created_at > NOW() - make_interval(days => $1) \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(window_days)
        .bind(max_rows)
        .fetch_all(pool)
        .await
    }
}
