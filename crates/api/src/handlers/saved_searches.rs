//! Handlers for saved-search CRUD and on-demand execution.
//!
//! Everything is scoped to the authenticated user at the repository layer,
//! so a wrong-owner id is indistinguishable from a missing row (404).
//! Duplicate names surface as 409 via the owner/name unique constraint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use xpshare_core::alert::{validate_alert_config, AlertFrequency};
use xpshare_core::error::CoreError;
use xpshare_core::filter::SearchFilters;
use xpshare_core::types::DbId;
use xpshare_db::models::saved_search::{CreateSavedSearch, SavedSearch, UpdateSavedSearch};
use xpshare_db::models::search::SearchResponse;
use xpshare_db::repositories::SavedSearchRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::search::run_search;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Result of executing a saved search on demand.
///
/// Carries only the fresh result count and rows; there is no diffing
/// against earlier executions and no duplicate-alert suppression.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub saved_search: SavedSearch,
    pub result_count: i64,
    pub search: SearchResponse,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a saved search exists for this owner, returning the row.
async fn ensure_owned(
    pool: &sqlx::PgPool,
    id: DbId,
    owner_id: DbId,
) -> AppResult<SavedSearch> {
    SavedSearchRepo::find_owned(pool, id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SavedSearch",
            id,
        }))
}

/// Deserialize a row's stored filters back into the structured model.
fn stored_filters(saved: &SavedSearch) -> AppResult<SearchFilters> {
    serde_json::from_value(saved.filters.clone()).map_err(|e| {
        AppError::InternalError(format!(
            "saved search {} has undecodable filters: {e}",
            saved.id
        ))
    })
}

// ---------------------------------------------------------------------------
// GET /saved-searches
// ---------------------------------------------------------------------------

/// List the authenticated user's saved searches, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = SavedSearchRepo::list_for_owner(&state.pool, auth.user_id).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed saved searches");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /saved-searches
// ---------------------------------------------------------------------------

/// Create a new saved search.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSavedSearch>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    input.filters.validate()?;

    let alert_enabled = input.alert_enabled.unwrap_or(false);
    validate_alert_config(alert_enabled, input.alert_frequency)?;

    let filters_json = serde_json::to_value(&input.filters)
        .map_err(|e| AppError::InternalError(format!("filters serialization failed: {e}")))?;

    let created = SavedSearchRepo::create(
        &state.pool,
        auth.user_id,
        input.name.trim(),
        &filters_json,
        alert_enabled,
        input.alert_frequency.map(|f| f.as_str()),
        input.notify_email.as_deref(),
    )
    .await?;

    tracing::info!(
        saved_search_id = created.id,
        user_id = auth.user_id,
        alert_enabled,
        "Saved search created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /saved-searches/{id}
// ---------------------------------------------------------------------------

/// Get a single saved search by id.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let saved = ensure_owned(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// PUT /saved-searches/{id}
// ---------------------------------------------------------------------------

/// Patch a saved search.
///
/// The alert invariant is checked against the effective post-patch state:
/// enabling alerts requires a frequency, either in the patch or already
/// stored. Toggling alerts off leaves the stored frequency in place for a
/// later re-enable.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSavedSearch>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_owned(&state.pool, id, auth.user_id).await?;

    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    if let Some(ref filters) = input.filters {
        filters.validate()?;
    }

    let effective_enabled = input.alert_enabled.unwrap_or(existing.alert_enabled);
    let stored_frequency: Option<AlertFrequency> = existing
        .alert_frequency
        .as_deref()
        .and_then(|raw| raw.parse().ok());
    validate_alert_config(effective_enabled, input.alert_frequency.or(stored_frequency))?;

    let filters_json = input
        .filters
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("filters serialization failed: {e}")))?;

    let updated = SavedSearchRepo::update(
        &state.pool,
        id,
        auth.user_id,
        input.name.as_deref().map(str::trim),
        filters_json.as_ref(),
        input.alert_enabled,
        input.alert_frequency.map(|f| f.as_str()),
        input.notify_email.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "SavedSearch",
        id,
    }))?;

    tracing::info!(saved_search_id = id, user_id = auth.user_id, "Saved search updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /saved-searches/{id}
// ---------------------------------------------------------------------------

/// Delete a saved search by id.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SavedSearchRepo::delete(&state.pool, id, auth.user_id).await?;
    if deleted {
        tracing::info!(saved_search_id = id, user_id = auth.user_id, "Saved search deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SavedSearch",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// POST /saved-searches/{id}/execute
// ---------------------------------------------------------------------------

/// Re-run a saved search's stored filters and return a fresh result count.
pub async fn execute(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let saved = ensure_owned(&state.pool, id, auth.user_id).await?;
    let filters = stored_filters(&saved)?;

    let search = run_search(&state.pool, &filters, None, None, Some(auth.user_id)).await?;

    tracing::debug!(
        saved_search_id = id,
        results = search.total_count,
        duration_ms = search.query_duration_ms,
        user_id = auth.user_id,
        "Saved search executed",
    );

    Ok(Json(DataResponse {
        data: ExecuteResponse {
            result_count: search.total_count,
            search,
            saved_search: saved,
        },
    }))
}
