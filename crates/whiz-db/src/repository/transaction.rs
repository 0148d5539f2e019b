//! # Transaction Repository
//!
//! Database operations for sales and their line items and payments.
//!
//! ## Sale Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create() - one DB transaction                       │
//! │                                                                         │
//! │  1. INSERT transaction row                                             │
//! │  2. For each line item:                                                │
//! │     └── UPDATE products SET stock = stock - qty                        │
//! │         WHERE id = ? AND stock >= qty     ← oversell guard             │
//! │     └── INSERT transaction_items row                                   │
//! │  3. INSERT payments rows                                               │
//! │  4. COMMIT (any failure rolls the whole sale back)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock guard makes oversell impossible even under concurrent
//! sales of the same product: the second writer sees the decremented
//! stock and its UPDATE matches no row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use whiz_core::money::Money;
use whiz_core::reporting::SaleTotal;
use whiz_core::types::{Payment, Transaction, TransactionItem};

// =============================================================================
// Aggregation Rows
// =============================================================================

/// Dashboard headline statistics for one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of completed transaction totals, all time.
    pub total_sales_cents: i64,

    /// Count of completed transactions, all time.
    pub transaction_count: i64,

    /// Sum of `price * stock` over active products.
    pub inventory_value_cents: i64,

    /// Sum of credit-method payments on completed transactions.
    pub credit_due_cents: i64,
}

/// Day-wide per-item sales row for the closing report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemSaleRow {
    pub name: String,
    pub quantity: i64,
    pub total_cents: i64,
}

/// Per-cashier per-item sales row for the closing report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CashierItemRow {
    pub cashier_name: String,
    pub name: String,
    pub quantity: i64,
    pub total_cents: i64,
}

/// Per-cashier per-method payment total for the closing report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CashierMethodTotal {
    pub cashier_name: String,
    pub method: String,
    pub total_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Creates a sale: transaction row, line items, payments, and stock
    /// decrements, atomically.
    ///
    /// Fails with [`DbError::TransactionFailed`] when any line item
    /// would drive stock negative; nothing is written in that case.
    pub async fn create(
        &self,
        transaction: &Transaction,
        items: &[TransactionItem],
        payments: &[Payment],
    ) -> DbResult<()> {
        debug!(id = %transaction.id, items = items.len(), "Creating transaction");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, business_id, device_id, user_id, cashier_name, status,
                subtotal_cents, tax_cents, total_cents, credit_customer,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.business_id)
        .bind(&transaction.device_id)
        .bind(&transaction.user_id)
        .bind(&transaction.cashier_name)
        .bind(transaction.status)
        .bind(transaction.subtotal_cents)
        .bind(transaction.tax_cents)
        .bind(transaction.total_cents)
        .bind(&transaction.credit_customer)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Rolls back the whole sale on drop
                return Err(DbError::TransactionFailed(format!(
                    "not enough stock for {}",
                    item.name
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, product_id, name,
                    quantity, unit_price_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.transaction_id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        for payment in payments {
            sqlx::query(
                r#"
                INSERT INTO payments (
                    id, transaction_id, method, amount_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&payment.id)
            .bind(&payment.transaction_id)
            .bind(payment.method)
            .bind(payment.amount_cents)
            .bind(payment.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %transaction.id,
            total = transaction.total_cents,
            items = items.len(),
            "Transaction created"
        );

        Ok(())
    }

    /// Gets a transaction by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(transaction)
    }

    /// Gets the line items of a transaction, in insertion order.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            "SELECT * FROM transaction_items WHERE transaction_id = ?1 ORDER BY rowid",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets the payments of a transaction.
    pub async fn get_payments(&self, transaction_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE transaction_id = ?1 ORDER BY rowid",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists recent transactions of a business, newest first.
    pub async fn list_recent(&self, business_id: &str, limit: i64) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE business_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Voids a completed transaction.
    ///
    /// Fails when the transaction does not exist or is not completed.
    pub async fn void(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET status = 'voided', updated_at = ?2
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "missing" from "wrong state" for the caller
            return match self.get_by_id(id).await? {
                None => Err(DbError::not_found("Transaction", id)),
                Some(txn) => Err(DbError::TransactionFailed(format!(
                    "transaction {} is {}, cannot void",
                    id,
                    txn.status.as_str()
                ))),
            };
        }

        info!(id = %id, "Transaction voided");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Aggregation
    // -------------------------------------------------------------------------

    /// Completed-transaction totals within `[start, end)`, for the
    /// dashboard chart bucketer.
    pub async fn totals_between(
        &self,
        business_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<SaleTotal>> {
        #[derive(sqlx::FromRow)]
        struct Row {
            created_at: DateTime<Utc>,
            total_cents: i64,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT created_at, total_cents FROM transactions
            WHERE business_id = ?1
              AND status = 'completed'
              AND created_at >= ?2
              AND created_at < ?3
            ORDER BY created_at
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SaleTotal {
                occurred_at: r.created_at,
                amount: Money::from_cents(r.total_cents),
            })
            .collect())
    }

    /// Headline statistics for the dashboard.
    pub async fn dashboard_stats(&self, business_id: &str) -> DbResult<DashboardStats> {
        let (total_sales_cents, transaction_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_cents), 0), COUNT(*)
            FROM transactions
            WHERE business_id = ?1 AND status = 'completed'
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        let inventory_value_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(price_cents * stock), 0)
            FROM products
            WHERE business_id = ?1 AND is_active = 1
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        let credit_due_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(p.amount_cents), 0)
            FROM payments p
            JOIN transactions t ON t.id = p.transaction_id
            WHERE t.business_id = ?1 AND t.status = 'completed' AND p.method = 'credit'
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_sales_cents,
            transaction_count,
            inventory_value_cents,
            credit_due_cents,
        })
    }

    /// Day-wide item totals for the closing report, biggest sellers first.
    pub async fn day_item_sales(
        &self,
        business_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<ItemSaleRow>> {
        let rows = sqlx::query_as::<_, ItemSaleRow>(
            r#"
            SELECT ti.name AS name,
                   SUM(ti.quantity) AS quantity,
                   SUM(ti.line_total_cents) AS total_cents
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            WHERE t.business_id = ?1
              AND t.status = 'completed'
              AND t.created_at >= ?2
              AND t.created_at < ?3
            GROUP BY ti.name
            ORDER BY total_cents DESC
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-cashier item totals for the closing report.
    pub async fn day_cashier_items(
        &self,
        business_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<CashierItemRow>> {
        let rows = sqlx::query_as::<_, CashierItemRow>(
            r#"
            SELECT t.cashier_name AS cashier_name,
                   ti.name AS name,
                   SUM(ti.quantity) AS quantity,
                   SUM(ti.line_total_cents) AS total_cents
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            WHERE t.business_id = ?1
              AND t.status = 'completed'
              AND t.created_at >= ?2
              AND t.created_at < ?3
            GROUP BY t.cashier_name, ti.name
            ORDER BY t.cashier_name, total_cents DESC
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-cashier payment totals by method for the closing report.
    pub async fn day_cashier_payments(
        &self,
        business_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<CashierMethodTotal>> {
        let rows = sqlx::query_as::<_, CashierMethodTotal>(
            r#"
            SELECT t.cashier_name AS cashier_name,
                   p.method AS method,
                   SUM(p.amount_cents) AS total_cents
            FROM payments p
            JOIN transactions t ON t.id = p.transaction_id
            WHERE t.business_id = ?1
              AND t.status = 'completed'
              AND t.created_at >= ?2
              AND t.created_at < ?3
            GROUP BY t.cashier_name, p.method
            ORDER BY t.cashier_name
            "#,
        )
        .bind(business_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
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
    use crate::repository::product::tests_support::sample_product;
    use chrono::Duration;
    use uuid::Uuid;
    use whiz_core::types::{PaymentMethod, Product, Role, TransactionStatus, User};

    async fn insert_test_user(db: &Database, business_id: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            name: "Mary".to_string(),
            email: format!("{}@kagwe.shop", Uuid::new_v4()),
            role: Role::Cashier,
            password_hash: None,
            pin_hash: "$argon2id$stub".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.users().insert(&user).await.unwrap();
        user
    }

    fn build_sale(
        business_id: &str,
        user: &User,
        product: &Product,
        quantity: i64,
        method: PaymentMethod,
    ) -> (Transaction, Vec<TransactionItem>, Vec<Payment>) {
        let now = Utc::now();
        let txn_id = Uuid::new_v4().to_string();
        let line_total = product.price_cents * quantity;

        let transaction = Transaction {
            id: txn_id.clone(),
            business_id: business_id.to_string(),
            device_id: None,
            user_id: user.id.clone(),
            cashier_name: user.name.clone(),
            status: TransactionStatus::Completed,
            subtotal_cents: line_total,
            tax_cents: 0,
            total_cents: line_total,
            credit_customer: None,
            created_at: now,
            updated_at: now,
        };

        let items = vec![TransactionItem {
            id: Uuid::new_v4().to_string(),
            transaction_id: txn_id.clone(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            line_total_cents: line_total,
        }];

        let payments = vec![Payment {
            id: Uuid::new_v4().to_string(),
            transaction_id: txn_id,
            method,
            amount_cents: line_total,
            created_at: now,
        }];

        (transaction, items, payments)
    }

    #[tokio::test]
    async fn test_create_decrements_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let user = insert_test_user(&db, &business_id).await;

        let product = sample_product(&business_id, "Bread", 10);
        db.products().insert(&product).await.unwrap();

        let (txn, items, payments) =
            build_sale(&business_id, &user, &product, 3, PaymentMethod::Cash);
        db.transactions().create(&txn, &items, &payments).await.unwrap();

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 7);

        let fetched = db.transactions().get_by_id(&txn.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_cents, 18000);
        assert_eq!(db.transactions().get_items(&txn.id).await.unwrap().len(), 1);
        assert_eq!(
            db.transactions().get_payments(&txn.id).await.unwrap()[0].method,
            PaymentMethod::Cash
        );
    }

    #[tokio::test]
    async fn test_oversell_rolls_back_whole_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let user = insert_test_user(&db, &business_id).await;

        let product = sample_product(&business_id, "Bread", 2);
        db.products().insert(&product).await.unwrap();

        let (txn, items, payments) =
            build_sale(&business_id, &user, &product, 5, PaymentMethod::Cash);
        let err = db
            .transactions()
            .create(&txn, &items, &payments)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));

        // Nothing written, stock untouched
        assert!(db.transactions().get_by_id(&txn.id).await.unwrap().is_none());
        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 2);
    }

    #[tokio::test]
    async fn test_void_transitions_and_guards() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let user = insert_test_user(&db, &business_id).await;

        let product = sample_product(&business_id, "Bread", 10);
        db.products().insert(&product).await.unwrap();

        let (txn, items, payments) =
            build_sale(&business_id, &user, &product, 1, PaymentMethod::Cash);
        db.transactions().create(&txn, &items, &payments).await.unwrap();

        db.transactions().void(&txn.id).await.unwrap();
        let voided = db.transactions().get_by_id(&txn.id).await.unwrap().unwrap();
        assert_eq!(voided.status, TransactionStatus::Voided);

        // Voiding twice fails
        assert!(db.transactions().void(&txn.id).await.is_err());
        // Voiding a missing id is NotFound
        assert!(matches!(
            db.transactions().void("missing").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_totals_between_excludes_voided_and_out_of_range() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let user = insert_test_user(&db, &business_id).await;

        let product = sample_product(&business_id, "Bread", 100);
        db.products().insert(&product).await.unwrap();

        let (txn1, items1, pay1) =
            build_sale(&business_id, &user, &product, 1, PaymentMethod::Cash);
        db.transactions().create(&txn1, &items1, &pay1).await.unwrap();

        let (txn2, items2, pay2) =
            build_sale(&business_id, &user, &product, 2, PaymentMethod::Mpesa);
        db.transactions().create(&txn2, &items2, &pay2).await.unwrap();
        db.transactions().void(&txn2.id).await.unwrap();

        let now = Utc::now();
        let totals = db
            .transactions()
            .totals_between(&business_id, now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].amount.cents(), 6000);

        // Window in the past matches nothing
        let past = db
            .transactions()
            .totals_between(
                &business_id,
                now - Duration::days(2),
                now - Duration::days(1),
            )
            .await
            .unwrap();
        assert!(past.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let user = insert_test_user(&db, &business_id).await;

        // price 6000, stock 10 → inventory value 60000 before sales
        let product = sample_product(&business_id, "Bread", 10);
        db.products().insert(&product).await.unwrap();

        let (txn1, items1, pay1) =
            build_sale(&business_id, &user, &product, 2, PaymentMethod::Cash);
        db.transactions().create(&txn1, &items1, &pay1).await.unwrap();

        let (txn2, items2, pay2) =
            build_sale(&business_id, &user, &product, 1, PaymentMethod::Credit);
        db.transactions().create(&txn2, &items2, &pay2).await.unwrap();

        let stats = db.transactions().dashboard_stats(&business_id).await.unwrap();
        assert_eq!(stats.total_sales_cents, 18000);
        assert_eq!(stats.transaction_count, 2);
        // 7 left in stock at 6000 each
        assert_eq!(stats.inventory_value_cents, 42000);
        assert_eq!(stats.credit_due_cents, 6000);
    }

    #[tokio::test]
    async fn test_closing_report_aggregation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let business_id = insert_test_business(&db).await;
        let mary = insert_test_user(&db, &business_id).await;

        let bread = sample_product(&business_id, "Bread", 50);
        let milk = sample_product(&business_id, "Milk 500ml", 50);
        db.products().insert(&bread).await.unwrap();
        db.products().insert(&milk).await.unwrap();

        let (t1, i1, p1) = build_sale(&business_id, &mary, &bread, 2, PaymentMethod::Cash);
        db.transactions().create(&t1, &i1, &p1).await.unwrap();
        let (t2, i2, p2) = build_sale(&business_id, &mary, &milk, 1, PaymentMethod::Mpesa);
        db.transactions().create(&t2, &i2, &p2).await.unwrap();

        let now = Utc::now();
        let start = now - Duration::hours(1);
        let end = now + Duration::hours(1);

        let items = db
            .transactions()
            .day_item_sales(&business_id, start, end)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        // Biggest seller first: bread 12000 vs milk 6000
        assert_eq!(items[0].name, "Bread");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].total_cents, 12000);

        let cashier_items = db
            .transactions()
            .day_cashier_items(&business_id, start, end)
            .await
            .unwrap();
        assert!(cashier_items.iter().all(|r| r.cashier_name == "Mary"));

        let payments = db
            .transactions()
            .day_cashier_payments(&business_id, start, end)
            .await
            .unwrap();
        let cash: i64 = payments
            .iter()
            .filter(|p| p.method == "cash")
            .map(|p| p.total_cents)
            .sum();
        let mpesa: i64 = payments
            .iter()
            .filter(|p| p.method == "mpesa")
            .map(|p| p.total_cents)
            .sum();
        assert_eq!(cash, 12000);
        assert_eq!(mpesa, 6000);
    }
}
