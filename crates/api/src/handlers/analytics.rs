//! Handlers for the analytics views.
//!
//! The popular-queries view aggregates database-side; the zero-result,
//! category, and hotspot views fetch a bounded recent window and fold it
//! with `xpshare_core::analytics`. Either way the summaries are recomputed
//! in full per request and never persisted.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use xpshare_core::analytics::{
    aggregate_query_stats, count_by_key, top_n, zero_result_queries, KeySample, QuerySample,
};
use xpshare_core::search::{KEY_SUMMARY_LIMIT, POPULAR_QUERIES_LIMIT, ZERO_RESULT_QUERIES_LIMIT};
use xpshare_db::models::search::{KeySampleRow, SearchQueryLog};
use xpshare_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Day window for the fold-based views.
const WINDOW_DAYS: i32 = 30;

/// Row cap for the fold-based views; keeps the in-memory fold bounded no
/// matter how busy the log gets.
const MAX_WINDOW_ROWS: i64 = 5000;

fn to_query_samples(rows: Vec<SearchQueryLog>) -> Vec<QuerySample> {
    rows.into_iter()
        .map(|row| QuerySample {
            query: row.query_text,
            result_count: row.result_count,
            clicked: row.clicked_result_id.is_some(),
            searched_at: row.created_at,
        })
        .collect()
}

fn to_key_samples(rows: Vec<KeySampleRow>) -> Vec<KeySample> {
    rows.into_iter()
        .map(|row| KeySample {
            key: row.key,
            observed_at: row.observed_at,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// GET /analytics/search/popular
// ---------------------------------------------------------------------------

/// Top queries over the whole search log, grouped database-side.
pub async fn popular_queries(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;

    let stats =
        AnalyticsRepo::popular_queries(&state.pool, POPULAR_QUERIES_LIMIT as i64).await?;
    tracing::debug!(count = stats.len(), "Popular-queries view computed");
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// GET /analytics/search/zero-results
// ---------------------------------------------------------------------------

/// Recent queries whose average result count is exactly zero.
pub async fn zero_results(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;

    let rows =
        AnalyticsRepo::recent_query_log(&state.pool, WINDOW_DAYS, MAX_WINDOW_ROWS).await?;
    let stats = aggregate_query_stats(&to_query_samples(rows));
    let zero = top_n(&zero_result_queries(&stats), ZERO_RESULT_QUERIES_LIMIT);

    tracing::debug!(count = zero.len(), "Zero-result view computed");
    Ok(Json(DataResponse { data: zero }))
}

// ---------------------------------------------------------------------------
// GET /analytics/categories
// ---------------------------------------------------------------------------

/// Most active experience categories in the recent window.
pub async fn categories(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows =
        AnalyticsRepo::recent_categories(&state.pool, WINDOW_DAYS, MAX_WINDOW_ROWS).await?;
    let counts = top_n(&count_by_key(&to_key_samples(rows)), KEY_SUMMARY_LIMIT);

    Ok(Json(DataResponse { data: counts }))
}

// ---------------------------------------------------------------------------
// GET /analytics/hotspots
// ---------------------------------------------------------------------------

/// Most reported locations in the recent window.
pub async fn hotspots(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = AnalyticsRepo::recent_hotspots(&state.pool, WINDOW_DAYS, MAX_WINDOW_ROWS).await?;
    let counts = top_n(&count_by_key(&to_key_samples(rows)), KEY_SUMMARY_LIMIT);

    Ok(Json(DataResponse { data: counts }))
}
