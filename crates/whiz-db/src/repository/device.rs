//! # Device Repository
//!
//! Database operations for linked terminals.
//!
//! ## Linking Flow
//! ```text
//! POST /v1/devices/link { api_key, fingerprint, device_type }
//!       │
//!       ▼
//! businesses.get_by_api_key() ── None ──► 401
//!       │
//!       ▼
//! devices.get_by_fingerprint()
//!       │
//!       ├── Some(device) → touch last_seen, reuse the record
//!       └── None         → insert a new device row
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use whiz_core::types::Device;

/// Repository for device database operations.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeviceRepository { pool }
    }

    /// Inserts a new device.
    pub async fn insert(&self, device: &Device) -> DbResult<()> {
        debug!(id = %device.id, fingerprint = %device.fingerprint, "Inserting device");

        sqlx::query(
            r#"
            INSERT INTO devices (
                id, business_id, fingerprint, device_type, last_seen, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&device.id)
        .bind(&device.business_id)
        .bind(&device.fingerprint)
        .bind(device.device_type)
        .bind(device.last_seen)
        .bind(device.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a device by its hardware fingerprint.
    pub async fn get_by_fingerprint(&self, fingerprint: &str) -> DbResult<Option<Device>> {
        let device =
            sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE fingerprint = ?1")
                .bind(fingerprint)
                .fetch_optional(&self.pool)
                .await?;

        Ok(device)
    }

    /// Updates the last-seen timestamp of a device.
    pub async fn touch_last_seen(&self, id: &str, seen_at: DateTime<Utc>) -> DbResult<()> {
        sqlx::query("UPDATE devices SET last_seen = ?2 WHERE id = ?1")
            .bind(id)
            .bind(seen_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Lists devices linked to a business.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE business_id = ?1 ORDER BY last_seen DESC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::business::tests_support::insert_test_business;
    use uuid::Uuid;
    use whiz_core::types::DeviceType;

    fn sample_device(business_id: &str, fingerprint: &str) -> Device {
        let now = Utc::now();
        Device {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            fingerprint: fingerprint.to_string(),
            device_type: DeviceType::Desktop,
            last_seen: now,
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_by_fingerprint() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.devices();

        let device = sample_device(&business_id, "fp-001");
        repo.insert(&device).await.unwrap();

        let found = repo.get_by_fingerprint("fp-001").await.unwrap().unwrap();
        assert_eq!(found.id, device.id);
        assert_eq!(found.device_type, DeviceType::Desktop);
    }

    #[tokio::test]
    async fn test_duplicate_fingerprint_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.devices();

        repo.insert(&sample_device(&business_id, "fp-dup"))
            .await
            .unwrap();
        let err = repo
            .insert(&sample_device(&business_id, "fp-dup"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
