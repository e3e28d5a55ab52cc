//! Route definitions for search.
//!
//! Mounted at `/search` in the API route tree.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes mounted at `/search`.
///
/// ```text
/// GET  /               -> keyword_search
/// POST /nlp            -> nlp_search
/// GET  /autocomplete   -> autocomplete
/// POST /click          -> record_click
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::keyword_search))
        .route("/nlp", post(search::nlp_search))
        .route("/autocomplete", get(search::autocomplete))
        .route("/click", post(search::record_click))
}
