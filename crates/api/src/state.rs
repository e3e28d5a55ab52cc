use std::sync::Arc;

use crate::config::ServerConfig;
use crate::nlp::NlpClient;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: xpshare_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Client for the external NLP query-understanding endpoint.
    pub nlp: Arc<NlpClient>,
}
