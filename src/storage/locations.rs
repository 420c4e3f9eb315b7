//! Resolved location persistence.
//!
//! One row per record identifier in `contact_locations`; a newer resolution
//! replaces the previous one.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use log::debug;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::geolocation::{LocationRecord, ProviderKind};
use crate::queue::LocationUpdater;

const TABLE: &str = "contact_locations";

/// Inserts or replaces the location stored for `record_id`.
pub async fn upsert_location(
    pool: &SqlitePool,
    record_id: &str,
    location: &LocationRecord,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO contact_locations (
            record_id, latitude, longitude, city, region, country, country_code,
            timezone, provider, accuracy, resolved_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(record_id) DO UPDATE SET
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            city = excluded.city,
            region = excluded.region,
            country = excluded.country,
            country_code = excluded.country_code,
            timezone = excluded.timezone,
            provider = excluded.provider,
            accuracy = excluded.accuracy,
            resolved_at_ms = excluded.resolved_at_ms",
    )
    .bind(record_id)
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(&location.city)
    .bind(&location.region)
    .bind(&location.country)
    .bind(&location.country_code)
    .bind(location.timezone.as_deref())
    .bind(location.provider.as_str())
    .bind(location.accuracy)
    .bind(location.created_at.timestamp_millis())
    .execute(pool)
    .await?;
    Ok(())
}

/// Loads the stored location for `record_id`, if any.
pub async fn fetch_location(
    pool: &SqlitePool,
    record_id: &str,
) -> Result<Option<LocationRecord>, DatabaseError> {
    let row = sqlx::query(
        "SELECT latitude, longitude, city, region, country, country_code,
                timezone, provider, accuracy, resolved_at_ms
         FROM contact_locations WHERE record_id = ?",
    )
    .bind(record_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let provider_id: String = row.get("provider");
    let provider = ProviderKind::from_str(&provider_id).map_err(|_| DatabaseError::CorruptRow {
        table: TABLE,
        reason: format!("unknown provider '{}'", provider_id),
    })?;
    let resolved_at_ms: i64 = row.get("resolved_at_ms");
    let created_at =
        DateTime::from_timestamp_millis(resolved_at_ms).ok_or_else(|| DatabaseError::CorruptRow {
            table: TABLE,
            reason: format!("timestamp {} out of range", resolved_at_ms),
        })?;

    Ok(Some(LocationRecord {
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        city: row.get("city"),
        region: row.get("region"),
        country: row.get("country"),
        country_code: row.get("country_code"),
        timezone: row.get("timezone"),
        provider,
        created_at,
        accuracy: row.get("accuracy"),
    }))
}

/// Number of records with a stored location.
pub async fn count_locations(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_locations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update callback that writes resolved locations to `contact_locations`.
#[derive(Debug, Clone)]
pub struct SqliteLocationUpdater {
    pool: SqlitePool,
}

impl SqliteLocationUpdater {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationUpdater for SqliteLocationUpdater {
    async fn update(&self, record_id: &str, location: &LocationRecord) -> anyhow::Result<()> {
        upsert_location(&self.pool, record_id, location).await?;
        debug!(
            "Stored location for {} ({}, {}) from {}",
            record_id, location.city, location.country_code, location.provider
        );
        Ok(())
    }
}
