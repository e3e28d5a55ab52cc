//! Controlled-vocabulary models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xpshare_core::types::{DbId, Timestamp};

/// A row from the `attribute_schema` table: one canonical value of one
/// attribute (e.g. attribute `shape`, value `triangle`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttributeValue {
    pub id: DbId,
    pub attribute: String,
    pub value: String,
    pub created_at: Timestamp,
}

/// DTO for adding a canonical value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttributeValue {
    pub attribute: String,
    pub value: String,
}

/// A row from the `custom_value_suggestions` review queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomValueSuggestion {
    pub id: DbId,
    pub attribute: String,
    pub value: String,
    pub submitted_by: DbId,
    pub status: String,
    /// Set when the suggestion was merged into an existing canonical value.
    pub merged_into_id: Option<DbId>,
    pub created_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}

/// DTO for submitting a free-text value for review.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSuggestion {
    pub attribute: String,
    pub value: String,
}
