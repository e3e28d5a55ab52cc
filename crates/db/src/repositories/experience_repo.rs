//! Repository for the `experiences` table.

use sqlx::PgPool;
use xpshare_core::types::DbId;

use crate::models::experience::{CreateExperience, Experience, UpdateExperience};

const COLUMNS: &str = "\
    id, owner_id, title, body, category, tags, latitude, longitude, \
    location_name, occurred_at, verification_status, similar_count, \
    solar_activity, moon_full, earthquake_nearby, geomagnetic_storm, \
    status, created_at, updated_at";

/// Provides CRUD operations for experiences.
pub struct ExperienceRepo;

impl ExperienceRepo {
    /// Insert a new draft experience, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateExperience,
    ) -> Result<Experience, sqlx::Error> {
        let query = format!(
            "INSERT INTO experiences \
                 (owner_id, title, body, category, tags, latitude, longitude, \
                  location_name, occurred_at, solar_activity, moon_full, \
                  earthquake_nearby, geomagnetic_storm) \
             VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'), $6, $7, $8, $9, \
                     COALESCE($10, FALSE), COALESCE($11, FALSE), \
                     COALESCE($12, FALSE), COALESCE($13, FALSE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location_name)
            .bind(input.occurred_at)
            .bind(input.solar_activity)
            .bind(input.moon_full)
            .bind(input.earthquake_nearby)
            .bind(input.geomagnetic_storm)
            .fetch_one(pool)
            .await
    }

    /// Find an experience by id, scoped to its owner.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM experiences WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's experiences, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Experience>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM experiences \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Patch an experience. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateExperience,
    ) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!(
            "UPDATE experiences SET \
                title = COALESCE($3, title), \
                body = COALESCE($4, body), \
                category = COALESCE($5, category), \
                tags = COALESCE($6, tags), \
                latitude = COALESCE($7, latitude), \
                longitude = COALESCE($8, longitude), \
                location_name = COALESCE($9, location_name), \
                occurred_at = COALESCE($10, occurred_at), \
                solar_activity = COALESCE($11, solar_activity), \
                moon_full = COALESCE($12, moon_full), \
                earthquake_nearby = COALESCE($13, earthquake_nearby), \
                geomagnetic_storm = COALESCE($14, geomagnetic_storm), \
                updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location_name)
            .bind(input.occurred_at)
            .bind(input.solar_activity)
            .bind(input.moon_full)
            .bind(input.earthquake_nearby)
            .bind(input.geomagnetic_storm)
            .fetch_optional(pool)
            .await
    }

    /// Publish a draft experience in a single statement.
    ///
    /// Returns `false` when the row exists but is already published; the
    /// caller distinguishes that from not-found by fetching first.
    pub async fn publish(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE experiences SET status = 'published', updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status = 'draft'",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an experience. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
