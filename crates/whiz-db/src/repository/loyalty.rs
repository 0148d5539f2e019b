//! # Loyalty Customer Repository
//!
//! Database operations for loyalty program members.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use whiz_core::loyalty;
use whiz_core::money::Money;
use whiz_core::types::LoyaltyCustomer;

/// Repository for loyalty customer database operations.
#[derive(Debug, Clone)]
pub struct LoyaltyRepository {
    pool: SqlitePool,
}

impl LoyaltyRepository {
    /// Creates a new LoyaltyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoyaltyRepository { pool }
    }

    /// Inserts a new loyalty customer.
    pub async fn insert(&self, customer: &LoyaltyCustomer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting loyalty customer");

        sqlx::query(
            r#"
            INSERT INTO loyalty_customers (
                id, business_id, name, phone, email, points, tier,
                total_spent_cents, visits_count, last_visit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.business_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.points)
        .bind(customer.tier)
        .bind(customer.total_spent_cents)
        .bind(customer.visits_count)
        .bind(customer.last_visit)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a loyalty customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LoyaltyCustomer>> {
        let customer = sqlx::query_as::<_, LoyaltyCustomer>(
            "SELECT * FROM loyalty_customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists loyalty customers of a business, highest points first.
    pub async fn list_for_business(&self, business_id: &str) -> DbResult<Vec<LoyaltyCustomer>> {
        let customers = sqlx::query_as::<_, LoyaltyCustomer>(
            r#"
            SELECT * FROM loyalty_customers
            WHERE business_id = ?1
            ORDER BY points DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Records a completed sale against a loyalty customer.
    ///
    /// Accrues points, bumps spend and visit counters, re-derives the
    /// tier, and stamps the visit time. Returns the updated customer.
    pub async fn record_visit(
        &self,
        id: &str,
        sale_total: Money,
        visited_at: DateTime<Utc>,
    ) -> DbResult<LoyaltyCustomer> {
        let customer = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("LoyaltyCustomer", id))?;

        let points = customer.points + loyalty::points_for_sale(sale_total);
        let tier = loyalty::tier_for_points(points);

        sqlx::query(
            r#"
            UPDATE loyalty_customers SET
                points = ?2,
                tier = ?3,
                total_spent_cents = total_spent_cents + ?4,
                visits_count = visits_count + 1,
                last_visit = ?5,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(points)
        .bind(tier)
        .bind(sale_total.cents())
        .bind(visited_at)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("LoyaltyCustomer", id))
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
    use uuid::Uuid;
    use whiz_core::types::LoyaltyTier;

    fn sample_customer(business_id: &str, name: &str) -> LoyaltyCustomer {
        let now = Utc::now();
        LoyaltyCustomer {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            name: name.to_string(),
            phone: Some("254712345678".to_string()),
            email: None,
            points: 0,
            tier: LoyaltyTier::Bronze,
            total_spent_cents: 0,
            visits_count: 0,
            last_visit: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_record_visit_accrues_points_and_tier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.loyalty();

        let customer = sample_customer(&business_id, "John Kamau");
        repo.insert(&customer).await.unwrap();

        // Ksh 2,500 sale → 25 points
        let updated = repo
            .record_visit(&customer.id, Money::from_shillings(2_500), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.points, 25);
        assert_eq!(updated.visits_count, 1);
        assert_eq!(updated.total_spent_cents, 250_000);
        assert_eq!(updated.tier, LoyaltyTier::Bronze);
        assert!(updated.last_visit.is_some());

        // A very large sale pushes the tier up
        let updated = repo
            .record_visit(&customer.id, Money::from_shillings(500_000), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.points, 5_025);
        assert_eq!(updated.tier, LoyaltyTier::Gold);
    }

    #[tokio::test]
    async fn test_list_orders_by_points() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.loyalty();

        let low = sample_customer(&business_id, "Low");
        let high = sample_customer(&business_id, "High");
        repo.insert(&low).await.unwrap();
        repo.insert(&high).await.unwrap();
        repo.record_visit(&high.id, Money::from_shillings(1_000), Utc::now())
            .await
            .unwrap();

        let customers = repo.list_for_business(&business_id).await.unwrap();
        assert_eq!(customers[0].name, "High");
    }

    #[tokio::test]
    async fn test_record_visit_missing_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let _ = insert_test_business(&db).await;

        let err = db
            .loyalty()
            .record_visit("missing", Money::from_shillings(100), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
