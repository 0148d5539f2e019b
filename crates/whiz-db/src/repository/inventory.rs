//! # Inventory Log Repository
//!
//! Append-only audit trail for manual stock adjustments.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use whiz_core::types::InventoryLog;

/// Repository for inventory log database operations.
#[derive(Debug, Clone)]
pub struct InventoryLogRepository {
    pool: SqlitePool,
}

impl InventoryLogRepository {
    /// Creates a new InventoryLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLogRepository { pool }
    }

    /// Appends an adjustment entry.
    pub async fn insert(&self, log: &InventoryLog) -> DbResult<()> {
        debug!(
            id = %log.id,
            product = %log.product_name,
            variance = log.variance,
            "Appending inventory log"
        );

        sqlx::query(
            r#"
            INSERT INTO inventory_logs (
                id, business_id, product_id, product_name,
                old_stock, new_stock, variance, reason, cashier_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&log.id)
        .bind(&log.business_id)
        .bind(&log.product_id)
        .bind(&log.product_name)
        .bind(log.old_stock)
        .bind(log.new_stock)
        .bind(log.variance)
        .bind(&log.reason)
        .bind(&log.cashier_name)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists adjustment entries of a business, newest first.
    pub async fn list_for_business(
        &self,
        business_id: &str,
        limit: i64,
    ) -> DbResult<Vec<InventoryLog>> {
        let logs = sqlx::query_as::<_, InventoryLog>(
            r#"
            SELECT * FROM inventory_logs
            WHERE business_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
