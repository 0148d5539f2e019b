//! # Expense Repository
//!
//! Database operations for expense records.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use whiz_core::types::Expense;

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts a new expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(id = %expense.id, amount = expense.amount_cents, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, business_id, description, amount_cents, category,
                supplier_id, supplier_name, recorded_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.business_id)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .bind(&expense.supplier_id)
        .bind(&expense.supplier_name)
        .bind(&expense.recorded_by)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists expenses of a business, newest first.
    pub async fn list_for_business(
        &self,
        business_id: &str,
        limit: i64,
    ) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT * FROM expenses
            WHERE business_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Total expenses within `[start, end)`, for the closing screen.
    pub async fn total_between(
        &self,
        business_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM expenses
            WHERE business_id = ?1 AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
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
    use chrono::Duration;
    use uuid::Uuid;

    fn sample_expense(business_id: &str, description: &str, amount_cents: i64) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            description: description.to_string(),
            amount_cents,
            category: Some("Utilities".to_string()),
            supplier_id: None,
            supplier_name: None,
            recorded_by: Some("Mary".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.expenses();

        repo.insert(&sample_expense(&business_id, "Electricity token", 50000))
            .await
            .unwrap();
        repo.insert(&sample_expense(&business_id, "Water refill", 20000))
            .await
            .unwrap();

        let expenses = repo.list_for_business(&business_id, 20).await.unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[tokio::test]
    async fn test_total_between() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let repo = db.expenses();

        repo.insert(&sample_expense(&business_id, "Airtime", 10000))
            .await
            .unwrap();
        repo.insert(&sample_expense(&business_id, "Transport", 15000))
            .await
            .unwrap();

        let now = Utc::now();
        let total = repo
            .total_between(&business_id, now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(total, 25000);
    }
}
