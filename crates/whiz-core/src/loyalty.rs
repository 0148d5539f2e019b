//! # Loyalty Rules
//!
//! Point accrual and tier derivation for the loyalty program.
//!
//! Accrual: one point per 100 shillings of a completed sale, rounded
//! down. Tiers are derived from lifetime points, never stored ahead of
//! the points that justify them.

use crate::money::Money;
use crate::types::LoyaltyTier;

/// Shillings of spend that earn one point.
pub const SHILLINGS_PER_POINT: i64 = 100;

/// Points required for the Silver tier.
pub const SILVER_THRESHOLD: i64 = 1_000;

/// Points required for the Gold tier.
pub const GOLD_THRESHOLD: i64 = 5_000;

/// Points earned by a completed sale of the given total.
///
/// ## Example
/// ```rust
/// use whiz_core::loyalty::points_for_sale;
/// use whiz_core::money::Money;
///
/// assert_eq!(points_for_sale(Money::from_shillings(250)), 2);
/// assert_eq!(points_for_sale(Money::from_shillings(99)), 0);
/// ```
pub fn points_for_sale(total: Money) -> i64 {
    if total.is_negative() {
        return 0;
    }
    total.shillings() / SHILLINGS_PER_POINT
}

/// Tier for a lifetime points balance.
pub fn tier_for_points(points: i64) -> LoyaltyTier {
    if points >= GOLD_THRESHOLD {
        LoyaltyTier::Gold
    } else if points >= SILVER_THRESHOLD {
        LoyaltyTier::Silver
    } else {
        LoyaltyTier::Bronze
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_for_sale() {
        assert_eq!(points_for_sale(Money::from_shillings(100)), 1);
        assert_eq!(points_for_sale(Money::from_shillings(199)), 1);
        assert_eq!(points_for_sale(Money::from_shillings(1000)), 10);
        assert_eq!(points_for_sale(Money::from_cents(9999)), 0);
        assert_eq!(points_for_sale(Money::from_cents(-5000)), 0);
    }

    #[test]
    fn test_tier_for_points() {
        assert_eq!(tier_for_points(0), LoyaltyTier::Bronze);
        assert_eq!(tier_for_points(999), LoyaltyTier::Bronze);
        assert_eq!(tier_for_points(1_000), LoyaltyTier::Silver);
        assert_eq!(tier_for_points(4_999), LoyaltyTier::Silver);
        assert_eq!(tier_for_points(5_000), LoyaltyTier::Gold);
    }
}
