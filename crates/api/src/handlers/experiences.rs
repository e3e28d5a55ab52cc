//! Handlers for experience CRUD and publication.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use xpshare_core::error::CoreError;
use xpshare_core::search::{clamp_limit, clamp_offset, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use xpshare_core::types::DbId;
use xpshare_db::models::experience::{CreateExperience, Experience, UpdateExperience};
use xpshare_db::repositories::ExperienceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that an experience exists for this owner, returning the row.
async fn ensure_owned(
    pool: &sqlx::PgPool,
    id: DbId,
    owner_id: DbId,
) -> AppResult<Experience> {
    ExperienceRepo::find_owned(pool, id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Experience",
            id,
        }))
}

fn require_non_blank(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST /experiences
// ---------------------------------------------------------------------------

/// Create a new draft experience.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateExperience>,
) -> AppResult<impl IntoResponse> {
    require_non_blank(&input.title, "title")?;
    require_non_blank(&input.body, "body")?;
    require_non_blank(&input.category, "category")?;

    let created = ExperienceRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, user_id = auth.user_id, "Experience created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /experiences
// ---------------------------------------------------------------------------

/// List the authenticated user's experiences, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = ExperienceRepo::list_for_owner(&state.pool, auth.user_id, limit, offset).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed experiences");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /experiences/{id}
// ---------------------------------------------------------------------------

/// Get a single experience by id.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let experience = ensure_owned(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: experience }))
}

// ---------------------------------------------------------------------------
// PUT /experiences/{id}
// ---------------------------------------------------------------------------

/// Patch an experience.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExperience>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        require_non_blank(title, "title")?;
    }
    if let Some(ref body) = input.body {
        require_non_blank(body, "body")?;
    }
    if let Some(ref category) = input.category {
        require_non_blank(category, "category")?;
    }

    let updated = ExperienceRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Experience",
            id,
        }))?;

    tracing::info!(id = updated.id, user_id = auth.user_id, "Experience updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /experiences/{id}/publish
// ---------------------------------------------------------------------------

/// Publish a draft experience.
///
/// Finalization is a single UPDATE statement, so there is no partial
/// state to compensate for: the experience is either published or it is
/// not. Publishing an already-published experience is a conflict.
pub async fn publish(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned(&state.pool, id, auth.user_id).await?;

    let published = ExperienceRepo::publish(&state.pool, id, auth.user_id).await?;
    if !published {
        return Err(AppError::Core(CoreError::Conflict(
            "experience is already published".to_string(),
        )));
    }

    let experience = ensure_owned(&state.pool, id, auth.user_id).await?;
    tracing::info!(id, user_id = auth.user_id, "Experience published");
    Ok(Json(DataResponse { data: experience }))
}

// ---------------------------------------------------------------------------
// DELETE /experiences/{id}
// ---------------------------------------------------------------------------

/// Delete an experience by id.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ExperienceRepo::delete(&state.pool, id, auth.user_id).await?;
    if deleted {
        tracing::info!(id, user_id = auth.user_id, "Experience deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Experience",
            id,
        }))
    }
}
