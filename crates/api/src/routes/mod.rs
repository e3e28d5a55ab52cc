pub mod analytics;
pub mod experiences;
pub mod health;
pub mod saved_searches;
pub mod search;
pub mod vocabulary;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /search                                  keyword search (GET)
/// /search/nlp                              NLP search (POST)
/// /search/autocomplete                     suggestions (GET)
/// /search/click                            record result click (POST)
///
/// /saved-searches                          list, create
/// /saved-searches/{id}                     get, update, delete
/// /saved-searches/{id}/execute             re-run stored filters (POST)
///
/// /analytics/search/popular                top queries (admin)
/// /analytics/search/zero-results           zero-result queries (admin)
/// /analytics/categories                    category summary
/// /analytics/hotspots                      location summary
///
/// /experiences                             list, create
/// /experiences/{id}                        get, update, delete
/// /experiences/{id}/publish                finalize draft (POST)
///
/// /vocabulary/attributes                   list, create (admin)
/// /vocabulary/suggestions                  submit, list (admin)
/// /vocabulary/suggestions/{id}/approve     approve (admin, POST)
/// /vocabulary/suggestions/{id}/reject      reject (admin, POST)
/// /vocabulary/suggestions/{id}/merge       merge (admin, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/search", search::router())
        .nest("/saved-searches", saved_searches::router())
        .nest("/analytics", analytics::router())
        .nest("/experiences", experiences::router())
        .nest("/vocabulary", vocabulary::router())
}
