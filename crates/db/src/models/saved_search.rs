//! Saved-search models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xpshare_core::alert::AlertFrequency;
use xpshare_core::filter::SearchFilters;
use xpshare_core::types::{DbId, Timestamp};

/// A row from the `saved_searches` table.
///
/// `filters` stays raw jsonb here; callers deserialize it into
/// [`SearchFilters`] at the point of use so old rows with extra fields
/// keep loading.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedSearch {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub filters: serde_json::Value,
    pub alert_enabled: bool,
    /// Retained when alerts are toggled off; ignored while disabled.
    pub alert_frequency: Option<String>,
    pub notify_email: Option<String>,
    pub last_alert_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new saved search.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSavedSearch {
    pub name: String,
    pub filters: SearchFilters,
    pub alert_enabled: Option<bool>,
    pub alert_frequency: Option<AlertFrequency>,
    pub notify_email: Option<String>,
}

/// DTO for patching an existing saved search. All fields are optional;
/// absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSavedSearch {
    pub name: Option<String>,
    pub filters: Option<SearchFilters>,
    pub alert_enabled: Option<bool>,
    pub alert_frequency: Option<AlertFrequency>,
    pub notify_email: Option<String>,
}
