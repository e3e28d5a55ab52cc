//! Client for the external NLP query-understanding endpoint.
//!
//! The endpoint is an opaque collaborator: we post the raw query text and
//! get back an "understood query" -- normalized keywords, any structured
//! filters the model extracted, and a confidence score. Its internals
//! (model, prompting, hosting) are none of this service's business.

use serde::{Deserialize, Serialize};
use xpshare_core::filter::SearchFilters;

/// Structured interpretation of a free-text query, as returned by the
/// external endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderstoodQuery {
    /// Normalized keyword text to search with.
    pub keywords: String,
    /// Filters the model extracted from the query, if any.
    pub filters: Option<SearchFilters>,
    /// Model confidence in `[0, 1]`.
    pub confidence: f32,
    /// Optional human-readable restatement shown in the UI.
    pub summary: Option<String>,
}

#[derive(Serialize)]
struct UnderstandRequest<'a> {
    query: &'a str,
}

/// Thin reqwest wrapper around the NLP endpoint.
pub struct NlpClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl NlpClient {
    /// Create a client. `base_url = None` disables understanding entirely.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Whether an NLP endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Ask the endpoint to interpret a query.
    ///
    /// Returns `Ok(None)` when no endpoint is configured. Network and
    /// decode failures surface as errors; callers decide whether to fall
    /// back to plain keyword search.
    pub async fn understand(
        &self,
        query: &str,
    ) -> Result<Option<UnderstoodQuery>, reqwest::Error> {
        let Some(base_url) = &self.base_url else {
            return Ok(None);
        };

        let understood = self
            .http
            .post(base_url)
            .json(&UnderstandRequest { query })
            .send()
            .await?
            .error_for_status()?
            .json::<UnderstoodQuery>()
            .await?;

        Ok(Some(understood))
    }
}
