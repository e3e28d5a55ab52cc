//! Route definitions for saved searches.
//!
//! Mounted at `/saved-searches` in the API route tree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::saved_searches;
use crate::state::AppState;

/// Saved-search routes mounted at `/saved-searches`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/execute  -> execute
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(saved_searches::list).post(saved_searches::create),
        )
        .route(
            "/{id}",
            get(saved_searches::get)
                .put(saved_searches::update)
                .delete(saved_searches::delete),
        )
        .route("/{id}/execute", post(saved_searches::execute))
}
