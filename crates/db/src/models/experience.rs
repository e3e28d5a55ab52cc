//! Experience models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xpshare_core::types::{DbId, Timestamp};

/// A row from the `experiences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Experience {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub occurred_at: Option<Timestamp>,
    pub verification_status: String,
    pub similar_count: i32,
    pub solar_activity: bool,
    pub moon_full: bool,
    pub earthquake_nearby: bool,
    pub geomagnetic_storm: bool,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new draft experience.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperience {
    pub title: String,
    pub body: String,
    pub category: String,
    pub tags: Option<Vec<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub occurred_at: Option<Timestamp>,
    pub solar_activity: Option<bool>,
    pub moon_full: Option<bool>,
    pub earthquake_nearby: Option<bool>,
    pub geomagnetic_storm: Option<bool>,
}

/// DTO for updating an existing experience. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExperience {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub occurred_at: Option<Timestamp>,
    pub solar_activity: Option<bool>,
    pub moon_full: Option<bool>,
    pub earthquake_nearby: Option<bool>,
    pub geomagnetic_storm: Option<bool>,
}
