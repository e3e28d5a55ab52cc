//! Route definitions for the controlled vocabulary.
//!
//! Mounted at `/vocabulary` in the API route tree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vocabulary;
use crate::state::AppState;

/// Vocabulary routes mounted at `/vocabulary`.
///
/// ```text
/// GET  /attributes                 -> list_values
/// POST /attributes                 -> create_value (admin)
/// GET  /suggestions                -> list_suggestions (admin)
/// POST /suggestions                -> submit_suggestion
/// POST /suggestions/{id}/approve   -> approve_suggestion (admin)
/// POST /suggestions/{id}/reject    -> reject_suggestion (admin)
/// POST /suggestions/{id}/merge     -> merge_suggestion (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/attributes",
            get(vocabulary::list_values).post(vocabulary::create_value),
        )
        .route(
            "/suggestions",
            get(vocabulary::list_suggestions).post(vocabulary::submit_suggestion),
        )
        .route(
            "/suggestions/{id}/approve",
            post(vocabulary::approve_suggestion),
        )
        .route(
            "/suggestions/{id}/reject",
            post(vocabulary::reject_suggestion),
        )
        .route(
            "/suggestions/{id}/merge",
            post(vocabulary::merge_suggestion),
        )
}
