//! Route definitions for experiences.
//!
//! Mounted at `/experiences` in the API route tree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::experiences;
use crate::state::AppState;

/// Experience routes mounted at `/experiences`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/publish  -> publish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(experiences::list).post(experiences::create))
        .route(
            "/{id}",
            get(experiences::get)
                .put(experiences::update)
                .delete(experiences::delete),
        )
        .route("/{id}/publish", post(experiences::publish))
}
