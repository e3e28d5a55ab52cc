//! Repository for the `saved_searches` table.
//!
//! All lookup and mutation methods take the owning user id and scope the
//! query to it; a wrong-owner id behaves exactly like a missing row. The
//! duplicate-name unique constraint (`uq_saved_searches_owner_name`)
//! surfaces as a database error the API layer maps to 409.

use sqlx::PgPool;
use xpshare_core::types::DbId;

use crate::models::saved_search::SavedSearch;

const COLUMNS: &str = "\
    id, owner_id, name, filters, alert_enabled, alert_frequency, \
    notify_email, last_alert_sent_at, created_at, updated_at";

/// Provides CRUD operations for saved searches.
pub struct SavedSearchRepo;

impl SavedSearchRepo {
    /// Insert a new saved search, returning the created row.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        name: &str,
        filters: &serde_json::Value,
        alert_enabled: bool,
        alert_frequency: Option<&str>,
        notify_email: Option<&str>,
    ) -> Result<SavedSearch, sqlx::Error> {
        let query = format!(
            "INSERT INTO saved_searches \
                 (owner_id, name, filters, alert_enabled, alert_frequency, notify_email) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(owner_id)
            .bind(name)
            .bind(filters)
            .bind(alert_enabled)
            .bind(alert_frequency)
            .bind(notify_email)
            .fetch_one(pool)
            .await
    }

    /// List a user's saved searches, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<SavedSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM saved_searches \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Find a saved search by id, scoped to its owner.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<SavedSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM saved_searches WHERE id = $1 AND owner_id = $2"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a saved search. Only non-`None` fields are applied.
    ///
    /// `alert_frequency` deliberately COALESCEs to the stored value, so
    /// disabling alerts keeps the last cadence for a later re-enable.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        name: Option<&str>,
        filters: Option<&serde_json::Value>,
        alert_enabled: Option<bool>,
        alert_frequency: Option<&str>,
        notify_email: Option<&str>,
    ) -> Result<Option<SavedSearch>, sqlx::Error> {
        let query = format!(
            "UPDATE saved_searches SET \
                name = COALESCE($3, name), \
                filters = COALESCE($4, filters), \
                alert_enabled = COALESCE($5, alert_enabled), \
                alert_frequency = COALESCE($6, alert_frequency), \
                notify_email = COALESCE($7, notify_email), \
                updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .bind(filters)
            .bind(alert_enabled)
            .bind(alert_frequency)
            .bind(notify_email)
            .fetch_optional(pool)
            .await
    }

    /// Delete a saved search. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saved_searches WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All saved searches with alerts enabled, for the scheduler sweep.
    ///
    /// Due-ness is decided in `xpshare_core::alert` against each row's
    /// frequency and last-sent timestamp.
    pub async fn list_alert_enabled(pool: &PgPool) -> Result<Vec<SavedSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM saved_searches \
             WHERE alert_enabled = TRUE \
             ORDER BY id"
        );
        sqlx::query_as::<_, SavedSearch>(&query).fetch_all(pool).await
    }

    /// Stamp a saved search as having just been alerted.
    pub async fn mark_alert_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE saved_searches SET last_alert_sent_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
