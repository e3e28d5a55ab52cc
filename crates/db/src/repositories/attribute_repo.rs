//! Repository for the controlled vocabulary and its review queue.

use sqlx::PgPool;
use xpshare_core::types::DbId;

use crate::models::attribute::{
    AttributeValue, CreateAttributeValue, CreateSuggestion, CustomValueSuggestion,
};

const VALUE_COLUMNS: &str = "id, attribute, value, created_at";

const SUGGESTION_COLUMNS: &str = "\
    id, attribute, value, submitted_by, status, merged_into_id, \
    created_at, reviewed_at";

/// Provides CRUD operations for attribute values and suggestions.
pub struct AttributeRepo;

impl AttributeRepo {
    // -----------------------------------------------------------------------
    // Canonical values
    // -----------------------------------------------------------------------

    /// List canonical values, optionally for one attribute.
    pub async fn list_values(
        pool: &PgPool,
        attribute: Option<&str>,
    ) -> Result<Vec<AttributeValue>, sqlx::Error> {
        let query = format!(
            "SELECT {VALUE_COLUMNS} FROM attribute_schema \
             WHERE ($1::TEXT IS NULL OR attribute = $1) \
             ORDER BY attribute, value"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(attribute)
            .fetch_all(pool)
            .await
    }

    /// Insert a canonical value, returning the created row.
    ///
    /// A duplicate (attribute, value) pair violates
    /// `uq_attribute_schema_attribute_value` and surfaces as a conflict.
    pub async fn create_value(
        pool: &PgPool,
        input: &CreateAttributeValue,
    ) -> Result<AttributeValue, sqlx::Error> {
        let query = format!(
            "INSERT INTO attribute_schema (attribute, value) \
             VALUES ($1, $2) \
             RETURNING {VALUE_COLUMNS}"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(&input.attribute)
            .bind(&input.value)
            .fetch_one(pool)
            .await
    }

    /// Find a canonical value by id.
    pub async fn find_value_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttributeValue>, sqlx::Error> {
        let query = format!("SELECT {VALUE_COLUMNS} FROM attribute_schema WHERE id = $1");
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Suggestions
    // -----------------------------------------------------------------------

    /// Submit a free-text value for review.
    pub async fn create_suggestion(
        pool: &PgPool,
        submitted_by: DbId,
        input: &CreateSuggestion,
    ) -> Result<CustomValueSuggestion, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_value_suggestions (attribute, value, submitted_by) \
             VALUES ($1, $2, $3) \
             RETURNING {SUGGESTION_COLUMNS}"
        );
        sqlx::query_as::<_, CustomValueSuggestion>(&query)
            .bind(&input.attribute)
            .bind(&input.value)
            .bind(submitted_by)
            .fetch_one(pool)
            .await
    }

    /// List suggestions, optionally filtered by status, oldest first so the
    /// review queue drains in submission order.
    pub async fn list_suggestions(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<CustomValueSuggestion>, sqlx::Error> {
        let query = format!(
            "SELECT {SUGGESTION_COLUMNS} FROM custom_value_suggestions \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, CustomValueSuggestion>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Find a suggestion by id.
    pub async fn find_suggestion_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CustomValueSuggestion>, sqlx::Error> {
        let query =
            format!("SELECT {SUGGESTION_COLUMNS} FROM custom_value_suggestions WHERE id = $1");
        sqlx::query_as::<_, CustomValueSuggestion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Settle a suggestion as rejected or merged.
    ///
    /// For merges, `merged_into` points at the existing canonical row.
    pub async fn review_suggestion(
        pool: &PgPool,
        id: DbId,
        status: &str,
        merged_into: Option<DbId>,
    ) -> Result<Option<CustomValueSuggestion>, sqlx::Error> {
        let query = format!(
            "UPDATE custom_value_suggestions SET \
                status = $2, \
                merged_into_id = $3, \
                reviewed_at = NOW() \
             WHERE id = $1 \
             RETURNING {SUGGESTION_COLUMNS}"
        );
        sqlx::query_as::<_, CustomValueSuggestion>(&query)
            .bind(id)
            .bind(status)
            .bind(merged_into)
            .fetch_optional(pool)
            .await
    }

    /// Approve a suggestion: promote its value into the canonical schema
    /// and mark the suggestion approved, in one transaction.
    ///
    /// Promotion is idempotent against the schema (an already-present
    /// value is left as-is).
    pub async fn approve_suggestion(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CustomValueSuggestion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let suggestion = sqlx::query_as::<_, CustomValueSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM custom_value_suggestions \
             WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(suggestion) = suggestion else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO attribute_schema (attribute, value) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_attribute_schema_attribute_value DO NOTHING",
        )
        .bind(&suggestion.attribute)
        .bind(&suggestion.value)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, CustomValueSuggestion>(&format!(
            "UPDATE custom_value_suggestions SET \
                status = 'approved', \
                reviewed_at = NOW() \
             WHERE id = $1 \
             RETURNING {SUGGESTION_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
