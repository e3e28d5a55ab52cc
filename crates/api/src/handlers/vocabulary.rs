//! Handlers for the controlled vocabulary and its review queue.
//!
//! Reading the canonical values and submitting suggestions is open to any
//! authenticated user; curation (adding values, reviewing suggestions) is
//! admin-only. Review transitions are validated by the pure state machine
//! in `xpshare_core::vocabulary` before touching the database.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use xpshare_core::error::CoreError;
use xpshare_core::types::DbId;
use xpshare_core::vocabulary::{check_transition, validate_term, SuggestionStatus};
use xpshare_db::models::attribute::{
    CreateAttributeValue, CreateSuggestion, CustomValueSuggestion,
};
use xpshare_db::repositories::AttributeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request shapes
// ---------------------------------------------------------------------------

/// Query parameters for listing canonical values.
#[derive(Debug, Deserialize)]
pub struct ListValuesParams {
    pub attribute: Option<String>,
}

/// Query parameters for listing suggestions.
#[derive(Debug, Deserialize)]
pub struct ListSuggestionsParams {
    pub status: Option<SuggestionStatus>,
}

/// Body for merging a suggestion into an existing canonical value.
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub into_id: DbId,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a suggestion and check that the requested review transition is
/// legal from its current status.
async fn ensure_reviewable(
    pool: &sqlx::PgPool,
    id: DbId,
    to: SuggestionStatus,
) -> AppResult<CustomValueSuggestion> {
    let suggestion = AttributeRepo::find_suggestion_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomValueSuggestion",
            id,
        }))?;

    let current: SuggestionStatus = suggestion.status.parse()?;
    check_transition(current, to)?;
    Ok(suggestion)
}

// ---------------------------------------------------------------------------
// GET /vocabulary/attributes
// ---------------------------------------------------------------------------

/// List canonical attribute values, optionally for one attribute.
pub async fn list_values(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListValuesParams>,
) -> AppResult<impl IntoResponse> {
    let values = AttributeRepo::list_values(&state.pool, params.attribute.as_deref()).await?;
    Ok(Json(DataResponse { data: values }))
}

// ---------------------------------------------------------------------------
// POST /vocabulary/attributes
// ---------------------------------------------------------------------------

/// Add a canonical value (admin only).
pub async fn create_value(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAttributeValue>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    validate_term(&input.attribute)?;
    validate_term(&input.value)?;

    let created = AttributeRepo::create_value(&state.pool, &input).await?;
    tracing::info!(
        id = created.id,
        attribute = %created.attribute,
        value = %created.value,
        "Vocabulary value created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// POST /vocabulary/suggestions
// ---------------------------------------------------------------------------

/// Submit a free-text value for admin review.
pub async fn submit_suggestion(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSuggestion>,
) -> AppResult<impl IntoResponse> {
    validate_term(&input.attribute)?;
    validate_term(&input.value)?;

    let created = AttributeRepo::create_suggestion(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        id = created.id,
        user_id = auth.user_id,
        attribute = %created.attribute,
        "Vocabulary suggestion submitted",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /vocabulary/suggestions
// ---------------------------------------------------------------------------

/// List suggestions, optionally by status (admin only).
pub async fn list_suggestions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListSuggestionsParams>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;

    let status = params.status.map(|s| s.as_str());
    let suggestions = AttributeRepo::list_suggestions(&state.pool, status).await?;
    Ok(Json(DataResponse { data: suggestions }))
}

// ---------------------------------------------------------------------------
// POST /vocabulary/suggestions/{id}/approve
// ---------------------------------------------------------------------------

/// Approve a pending suggestion: its value joins the canonical schema.
pub async fn approve_suggestion(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    ensure_reviewable(&state.pool, id, SuggestionStatus::Approved).await?;

    let approved = AttributeRepo::approve_suggestion(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CustomValueSuggestion",
            id,
        }))?;

    tracing::info!(id, admin_id = auth.user_id, "Vocabulary suggestion approved");
    Ok(Json(DataResponse { data: approved }))
}

// ---------------------------------------------------------------------------
// POST /vocabulary/suggestions/{id}/reject
// ---------------------------------------------------------------------------

/// Reject a pending suggestion.
pub async fn reject_suggestion(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    ensure_reviewable(&state.pool, id, SuggestionStatus::Rejected).await?;

    let rejected = AttributeRepo::review_suggestion(
        &state.pool,
        id,
        SuggestionStatus::Rejected.as_str(),
        None,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "CustomValueSuggestion",
        id,
    }))?;

    tracing::info!(id, admin_id = auth.user_id, "Vocabulary suggestion rejected");
    Ok(Json(DataResponse { data: rejected }))
}

// ---------------------------------------------------------------------------
// POST /vocabulary/suggestions/{id}/merge
// ---------------------------------------------------------------------------

/// Fold a pending suggestion into an existing canonical value.
pub async fn merge_suggestion(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MergeRequest>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    ensure_reviewable(&state.pool, id, SuggestionStatus::Merged).await?;

    // The merge target must be a real canonical value.
    AttributeRepo::find_value_by_id(&state.pool, input.into_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AttributeValue",
            id: input.into_id,
        }))?;

    let merged = AttributeRepo::review_suggestion(
        &state.pool,
        id,
        SuggestionStatus::Merged.as_str(),
        Some(input.into_id),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "CustomValueSuggestion",
        id,
    }))?;

    tracing::info!(
        id,
        into_id = input.into_id,
        admin_id = auth.user_id,
        "Vocabulary suggestion merged",
    );
    Ok(Json(DataResponse { data: merged }))
}
