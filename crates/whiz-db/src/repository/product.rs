//! # Product Repository
//!
//! Database operations for the product catalog, including the stock
//! adjustments that back the inventory log.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use whiz_core::types::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, business_id, name, price_cents, stock, category,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.business_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists active products of a business.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE business_id = ?1 AND is_active = 1 ORDER BY name",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches active products by name substring.
    pub async fn search(
        &self,
        business_id: &str,
        query: &str,
        limit: i64,
    ) -> DbResult<Vec<Product>> {
        let pattern = format!("%{query}%");
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE business_id = ?1 AND is_active = 1 AND name LIKE ?2
            ORDER BY name
            LIMIT ?3
            "#,
        )
        .bind(business_id)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates a product's editable fields.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2, price_cents = ?3, stock = ?4,
                category = ?5, is_active = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product (deactivates it).
    ///
    /// Rows are never removed; transaction items reference them.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets a product's stock level and returns the previous level.
    ///
    /// Used for manual adjustments; the caller records the inventory
    /// log entry with the returned old stock.
    pub async fn set_stock(&self, id: &str, new_stock: i64) -> DbResult<i64> {
        let product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(product.stock)
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::business::tests_support::insert_test_business;
    use crate::repository::product::tests_support::sample_product;

    #[tokio::test]
    async fn test_insert_list_and_search() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.products();

        repo.insert(&sample_product(&business_id, "Bread", 10))
            .await
            .unwrap();
        repo.insert(&sample_product(&business_id, "Brown Bread", 5))
            .await
            .unwrap();
        repo.insert(&sample_product(&business_id, "Milk 500ml", 20))
            .await
            .unwrap();

        let all = repo.list_for_business(&business_id).await.unwrap();
        assert_eq!(all.len(), 3);

        let breads = repo.search(&business_id, "Bread", 20).await.unwrap();
        assert_eq!(breads.len(), 2);
    }

    #[tokio::test]
    async fn test_deactivated_products_are_hidden() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.products();

        let product = sample_product(&business_id, "Soda", 12);
        repo.insert(&product).await.unwrap();
        repo.deactivate(&product.id).await.unwrap();

        assert!(repo.list_for_business(&business_id).await.unwrap().is_empty());
        // Still fetchable by id for history
        assert!(repo.get_by_id(&product.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_stock_returns_old_level() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.products();

        let product = sample_product(&business_id, "Sugar 1kg", 7);
        repo.insert(&product).await.unwrap();

        let old = repo.set_stock(&product.id, 50).await.unwrap();
        assert_eq!(old, 7);
        assert_eq!(repo.get_by_id(&product.id).await.unwrap().unwrap().stock, 50);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.products();

        let ghost = sample_product(&business_id, "Ghost", 0);
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
