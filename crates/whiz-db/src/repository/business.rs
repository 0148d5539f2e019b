//! # Business Repository
//!
//! Database operations for businesses (tenants) and their receipt
//! profile settings.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use whiz_core::types::{Business, ReceiptProfile};

/// Repository for business database operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: SqlitePool,
}

impl BusinessRepository {
    /// Creates a new BusinessRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BusinessRepository { pool }
    }

    /// Inserts a new business.
    ///
    /// Fails with a unique violation when the API key collides
    /// (practically impossible for UUID keys, but enforced anyway).
    pub async fn insert(&self, business: &Business) -> DbResult<()> {
        debug!(id = %business.id, name = %business.name, "Inserting business");

        sqlx::query(
            r#"
            INSERT INTO businesses (
                id, name, api_key, subscription_plan, currency, tax_rate_bps,
                address, phone, receipt_header, receipt_footer,
                mpesa_paybill, mpesa_account_number, mpesa_till,
                show_developer_footer, printer_paper_width,
                brand_primary, brand_secondary,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15,
                ?16, ?17,
                ?18, ?19
            )
            "#,
        )
        .bind(&business.id)
        .bind(&business.name)
        .bind(&business.api_key)
        .bind(business.subscription_plan)
        .bind(&business.currency)
        .bind(business.tax_rate_bps)
        .bind(&business.address)
        .bind(&business.phone)
        .bind(&business.receipt_header)
        .bind(&business.receipt_footer)
        .bind(&business.mpesa_paybill)
        .bind(&business.mpesa_account_number)
        .bind(&business.mpesa_till)
        .bind(business.show_developer_footer)
        .bind(business.printer_paper_width)
        .bind(&business.brand_primary)
        .bind(&business.brand_secondary)
        .bind(business.created_at)
        .bind(business.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a business by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Business>> {
        let business = sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    /// Gets a business by its API key (device linking).
    pub async fn get_by_api_key(&self, api_key: &str) -> DbResult<Option<Business>> {
        let business = sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE api_key = ?1",
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    /// Updates the receipt profile settings of a business.
    pub async fn update_receipt_profile(
        &self,
        id: &str,
        profile: &ReceiptProfile,
    ) -> DbResult<()> {
        debug!(id = %id, "Updating business receipt profile");

        sqlx::query(
            r#"
            UPDATE businesses SET
                name = ?2,
                address = ?3,
                phone = ?4,
                receipt_header = ?5,
                receipt_footer = ?6,
                mpesa_paybill = ?7,
                mpesa_account_number = ?8,
                mpesa_till = ?9,
                show_developer_footer = ?10,
                printer_paper_width = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&profile.business_name)
        .bind(&profile.address)
        .bind(&profile.phone)
        .bind(&profile.receipt_header)
        .bind(&profile.receipt_footer)
        .bind(&profile.mpesa_paybill)
        .bind(&profile.mpesa_account_number)
        .bind(&profile.mpesa_till)
        .bind(profile.show_developer_footer)
        .bind(profile.printer_paper_width)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Test Support
// =============================================================================

/// Shared helpers for repository tests in this crate.
#[cfg(test)]
pub(crate) mod tests_support {
    use chrono::Utc;
    use uuid::Uuid;
    use whiz_core::types::{Business, SubscriptionPlan};

    use crate::pool::Database;

    /// Inserts a throwaway business and returns its id.
    pub async fn insert_test_business(db: &Database) -> String {
        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4().to_string(),
            name: "Test Duka".to_string(),
            api_key: Uuid::new_v4().to_string(),
            subscription_plan: SubscriptionPlan::Free,
            currency: "KES".to_string(),
            tax_rate_bps: 0,
            address: None,
            phone: None,
            receipt_header: None,
            receipt_footer: None,
            mpesa_paybill: None,
            mpesa_account_number: None,
            mpesa_till: None,
            show_developer_footer: true,
            printer_paper_width: 80,
            brand_primary: "#0047FF".to_string(),
            brand_secondary: "#FFD700".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.businesses().insert(&business).await.unwrap();
        business.id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
