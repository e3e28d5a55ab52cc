//! Route definitions for the analytics views.
//!
//! Mounted at `/analytics` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Analytics routes mounted at `/analytics`.
///
/// ```text
/// GET /search/popular       -> popular_queries (admin)
/// GET /search/zero-results  -> zero_results (admin)
/// GET /categories           -> categories
/// GET /hotspots             -> hotspots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search/popular", get(analytics::popular_queries))
        .route("/search/zero-results", get(analytics::zero_results))
        .route("/categories", get(analytics::categories))
        .route("/hotspots", get(analytics::hotspots))
}
