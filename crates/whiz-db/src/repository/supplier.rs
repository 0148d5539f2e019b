//! # Supplier Repository
//!
//! Database operations for goods suppliers.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use whiz_core::types::Supplier;

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Inserts a new supplier.
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, business_id, name, contact, location, active, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.business_id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.location)
        .bind(supplier.active)
        .bind(&supplier.notes)
        .bind(supplier.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a supplier by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Lists suppliers of a business, active first.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT * FROM suppliers
            WHERE business_id = ?1
            ORDER BY active DESC, name
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Updates a supplier's editable fields.
    pub async fn update(&self, supplier: &Supplier) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2, contact = ?3, location = ?4, active = ?5, notes = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.location)
        .bind(supplier.active)
        .bind(&supplier.notes)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", &supplier.id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::business::tests_support::insert_test_business;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_supplier(business_id: &str, name: &str) -> Supplier {
        Supplier {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            name: name.to_string(),
            contact: Some("0712 111222".to_string()),
            location: Some("Thika".to_string()),
            active: true,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_update_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.suppliers();

        let mut supplier = sample_supplier(&business_id, "Thika Millers");
        repo.insert(&supplier).await.unwrap();
        repo.insert(&sample_supplier(&business_id, "Brookside Depot"))
            .await
            .unwrap();

        supplier.active = false;
        supplier.notes = Some("Late deliveries".to_string());
        repo.update(&supplier).await.unwrap();

        let suppliers = repo.list_for_business(&business_id).await.unwrap();
        assert_eq!(suppliers.len(), 2);
        // Inactive suppliers sort last
        assert_eq!(suppliers[0].name, "Brookside Depot");
        assert!(!suppliers[1].active);
    }

    #[tokio::test]
    async fn test_update_missing_supplier_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.suppliers();

        let ghost = sample_supplier(&business_id, "Ghost");
        assert!(matches!(
            repo.update(&ghost).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
