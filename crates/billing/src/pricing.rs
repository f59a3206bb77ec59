//! Fixed price table
//!
//! The academic tier already carries the 50% academic discount relative to
//! professional-adjacent pricing; annual plans are ten monthly payments'
//! worth for twelve months of service.

use scholarly_shared::{BillingPeriod, SubscriptionTier};

/// Price in cents for a tier and billing period.
pub fn amount_cents(tier: SubscriptionTier, period: BillingPeriod) -> i64 {
    match (tier, period) {
        (SubscriptionTier::Academic, BillingPeriod::Monthly) => 4_950,
        (SubscriptionTier::Academic, BillingPeriod::Annual) => 49_500,
        (SubscriptionTier::Professional, BillingPeriod::Monthly) => 29_900,
        (SubscriptionTier::Professional, BillingPeriod::Annual) => 299_000,
        (SubscriptionTier::Enterprise, BillingPeriod::Monthly) => 99_900,
        (SubscriptionTier::Enterprise, BillingPeriod::Annual) => 999_000,
    }
}

/// Monthly revenue estimate per active subscription of a tier, in dollars.
/// Used only for the admin statistics endpoint.
pub fn monthly_revenue_dollars(tier: SubscriptionTier) -> f64 {
    amount_cents(tier, BillingPeriod::Monthly) as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn professional_amounts_match_price_table() {
        assert_eq!(
            amount_cents(SubscriptionTier::Professional, BillingPeriod::Monthly),
            29_900
        );
        assert_eq!(
            amount_cents(SubscriptionTier::Professional, BillingPeriod::Annual),
            299_000
        );
    }

    #[test]
    fn academic_tier_is_half_of_list_price() {
        assert_eq!(
            amount_cents(SubscriptionTier::Academic, BillingPeriod::Monthly),
            4_950
        );
        assert_eq!(
            amount_cents(SubscriptionTier::Academic, BillingPeriod::Annual),
            49_500
        );
    }

    #[test]
    fn enterprise_amounts() {
        assert_eq!(
            amount_cents(SubscriptionTier::Enterprise, BillingPeriod::Monthly),
            99_900
        );
        assert_eq!(
            amount_cents(SubscriptionTier::Enterprise, BillingPeriod::Annual),
            999_000
        );
    }

    #[test]
    fn revenue_estimate_uses_monthly_price() {
        assert_eq!(monthly_revenue_dollars(SubscriptionTier::Academic), 49.5);
        assert_eq!(monthly_revenue_dollars(SubscriptionTier::Professional), 299.0);
        assert_eq!(monthly_revenue_dollars(SubscriptionTier::Enterprise), 999.0);
    }
}
