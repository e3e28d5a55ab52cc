//! Handlers for experience search: keyword mode, NLP mode, result-click
//! reporting, and autocomplete.
//!
//! Every executed search is logged to the analytics table fire-and-forget;
//! a logging failure never fails the search itself.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use xpshare_core::error::CoreError;
use xpshare_core::filter::SearchFilters;
use xpshare_core::search::MIN_AUTOCOMPLETE_CHARS;
use xpshare_core::types::DbId;
use xpshare_db::models::search::{AutocompleteParams, SearchParams, SearchResponse};
use xpshare_db::repositories::SearchRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::nlp::UnderstoodQuery;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body for the NLP search endpoint.
#[derive(Debug, Deserialize)]
pub struct NlpSearchRequest {
    pub filters: SearchFilters,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// NLP search response: the regular search response plus what the model
/// understood (absent when understanding was unavailable and the search
/// fell back to raw keywords).
#[derive(Debug, Serialize)]
pub struct NlpSearchResponse {
    #[serde(flatten)]
    pub response: SearchResponse,
    pub understood: Option<UnderstoodQuery>,
}

/// Body for reporting a result click against a logged search.
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub search_id: DbId,
    pub result_id: DbId,
}

// ---------------------------------------------------------------------------
// Shared search execution helper
// ---------------------------------------------------------------------------

/// Execute a filtered search with timing and analytics logging.
///
/// Used by keyword search, NLP search, and saved-search execution so the
/// log-and-time assembly exists exactly once.
pub(crate) async fn run_search(
    pool: &sqlx::PgPool,
    filters: &SearchFilters,
    limit: Option<i64>,
    offset: Option<i64>,
    user_id: Option<DbId>,
) -> Result<SearchResponse, sqlx::Error> {
    let start = std::time::Instant::now();

    let results = SearchRepo::search(pool, filters, limit, offset).await?;

    let duration_ms = start.elapsed().as_millis() as i64;
    let total_count = results.len() as i64;

    // Log analytics (fire-and-forget, do not fail the request on log error)
    let filters_json = serde_json::to_value(filters).unwrap_or_default();
    let search_id = match SearchRepo::log_search_query(
        pool,
        filters.keywords.trim(),
        &filters_json,
        total_count as i32,
        duration_ms as i32,
        user_id,
    )
    .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to log search query");
            None
        }
    };

    Ok(SearchResponse {
        search_id,
        total_count,
        results,
        query_duration_ms: duration_ms,
    })
}

// ---------------------------------------------------------------------------
// GET /search
// ---------------------------------------------------------------------------

/// Keyword search over published experiences with the full filter set.
pub async fn keyword_search(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = (params.limit, params.offset);
    let filters = params.into_filters();
    filters.validate()?;

    let response = run_search(&state.pool, &filters, limit, offset, Some(auth.user_id)).await?;

    tracing::debug!(
        query = %filters.keywords,
        results = response.total_count,
        duration_ms = response.query_duration_ms,
        user_id = auth.user_id,
        "Search executed",
    );

    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// POST /search/nlp
// ---------------------------------------------------------------------------

/// NLP search: ask the external endpoint to interpret the query, overlay
/// the understood filters, and run the same search.
///
/// Hybrid behaviour: when the endpoint is unconfigured or fails, the
/// search falls back to the raw keywords and `understood` stays empty.
pub async fn nlp_search(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NlpSearchRequest>,
) -> AppResult<impl IntoResponse> {
    let query = input.filters.nlp_query()?.to_string();
    input.filters.validate()?;

    let understood = match state.nlp.understand(&query).await {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "NLP endpoint unavailable, falling back to keywords");
            None
        }
    };

    let filters = match &understood {
        Some(u) => overlay_understood(input.filters, u),
        None => input.filters,
    };

    let response = run_search(
        &state.pool,
        &filters,
        input.limit,
        input.offset,
        Some(auth.user_id),
    )
    .await?;

    tracing::debug!(
        query = %query,
        understood = understood.is_some(),
        results = response.total_count,
        user_id = auth.user_id,
        "NLP search executed",
    );

    Ok(Json(DataResponse {
        data: NlpSearchResponse {
            response,
            understood,
        },
    }))
}

/// Overlay an understood query onto the caller's filters.
///
/// The model's normalized keywords replace the raw text, and any filter
/// the model extracted wins over the caller's value; fields the model
/// left at their defaults keep the caller's settings.
fn overlay_understood(mut filters: SearchFilters, understood: &UnderstoodQuery) -> SearchFilters {
    if !understood.keywords.trim().is_empty() {
        filters.keywords = understood.keywords.clone();
    }

    let Some(extracted) = &understood.filters else {
        return filters;
    };
    let defaults = SearchFilters::default();

    if !extracted.categories.is_empty() {
        filters.categories = extracted.categories.clone();
    }
    if extracted.location.is_some() {
        filters.location = extracted.location.clone();
        filters.radius_km = extracted.radius_km;
    }
    if extracted.date_from.is_some() {
        filters.date_from = extracted.date_from;
    }
    if extracted.date_to.is_some() {
        filters.date_to = extracted.date_to;
    }
    if !extracted.tags.is_empty() {
        filters.tags = extracted.tags.clone();
    }
    filters.solar_activity |= extracted.solar_activity;
    filters.moon_full |= extracted.moon_full;
    filters.earthquake_nearby |= extracted.earthquake_nearby;
    filters.geomagnetic_storm |= extracted.geomagnetic_storm;
    if extracted.verification != defaults.verification {
        filters.verification = extracted.verification;
    }
    if extracted.min_similar_count != defaults.min_similar_count {
        filters.min_similar_count = extracted.min_similar_count;
    }

    filters
}

// ---------------------------------------------------------------------------
// POST /search/click
// ---------------------------------------------------------------------------

/// Record that a logged search led to a result click.
pub async fn record_click(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ClickRequest>,
) -> AppResult<StatusCode> {
    let recorded = SearchRepo::record_click(&state.pool, input.search_id, input.result_id).await?;

    if !recorded {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SearchQuery",
            id: input.search_id,
        }));
    }

    tracing::debug!(
        search_id = input.search_id,
        result_id = input.result_id,
        user_id = auth.user_id,
        "Result click recorded",
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /search/autocomplete
// ---------------------------------------------------------------------------

/// Prefix suggestions for search-as-you-type.
///
/// Queries below the minimum length return empty without touching the
/// database; the client debounces its calls and discards stale responses
/// by sequence token.
pub async fn autocomplete(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<impl IntoResponse> {
    let suggestions = if params.q.trim().chars().count() < MIN_AUTOCOMPLETE_CHARS {
        Vec::new()
    } else {
        SearchRepo::autocomplete(&state.pool, params.q.trim(), params.limit).await?
    };

    Ok(Json(DataResponse { data: suggestions }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use xpshare_core::filter::{GeoPoint, Verification};

    fn understood(keywords: &str, filters: Option<SearchFilters>) -> UnderstoodQuery {
        UnderstoodQuery {
            keywords: keywords.to_string(),
            filters,
            confidence: 0.9,
            summary: None,
        }
    }

    #[test]
    fn overlay_replaces_keywords() {
        let base = SearchFilters {
            keywords: "weird lights over the lake last summer".to_string(),
            ..Default::default()
        };
        let merged = overlay_understood(base, &understood("lights lake", None));
        assert_eq!(merged.keywords, "lights lake");
    }

    #[test]
    fn overlay_prefers_extracted_filters_but_keeps_caller_defaults() {
        let base = SearchFilters {
            keywords: "orbs".to_string(),
            categories: vec!["dream".to_string()],
            min_similar_count: 5,
            ..Default::default()
        };
        let extracted = SearchFilters {
            categories: vec!["ufo".to_string()],
            location: Some(GeoPoint {
                lat: 47.6,
                lng: 9.5,
                name: Some("Bodensee".to_string()),
            }),
            radius_km: 10.0,
            moon_full: true,
            ..Default::default()
        };
        let merged = overlay_understood(base, &understood("orbs", Some(extracted)));

        assert_eq!(merged.categories, vec!["ufo"]);
        assert_eq!(merged.radius_km, 10.0);
        assert!(merged.moon_full);
        // Fields the model left at defaults keep the caller's values.
        assert_eq!(merged.min_similar_count, 5);
        assert_eq!(merged.verification, Verification::All);
    }

    #[test]
    fn overlay_without_understanding_is_identity() {
        let base = SearchFilters {
            keywords: "shadow figure".to_string(),
            tags: vec!["night".to_string()],
            ..Default::default()
        };
        let merged = overlay_understood(base.clone(), &understood("", None));
        assert_eq!(merged, base);
    }
}
