//! Stripe client wrapper and configuration

use std::sync::Arc;

use scholarly_shared::{BillingPeriod, SubscriptionTier};

use crate::error::{BillingError, BillingResult};

/// Stripe price IDs for each tier and billing period.
///
/// Prices are created once in the Stripe dashboard; the amounts they carry
/// must match the fixed table in [`crate::pricing`].
#[derive(Debug, Clone, Default)]
pub struct PriceIds {
    pub academic_monthly: String,
    pub academic_annual: String,
    pub professional_monthly: String,
    pub professional_annual: String,
    pub enterprise_monthly: String,
    pub enterprise_annual: String,
}

impl PriceIds {
    pub fn for_plan(&self, tier: SubscriptionTier, period: BillingPeriod) -> &str {
        match (tier, period) {
            (SubscriptionTier::Academic, BillingPeriod::Monthly) => &self.academic_monthly,
            (SubscriptionTier::Academic, BillingPeriod::Annual) => &self.academic_annual,
            (SubscriptionTier::Professional, BillingPeriod::Monthly) => &self.professional_monthly,
            (SubscriptionTier::Professional, BillingPeriod::Annual) => &self.professional_annual,
            (SubscriptionTier::Enterprise, BillingPeriod::Monthly) => &self.enterprise_monthly,
            (SubscriptionTier::Enterprise, BillingPeriod::Annual) => &self.enterprise_annual,
        }
    }
}

/// Stripe configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub price_ids: PriceIds,
}

impl StripeConfig {
    pub fn from_env() -> BillingResult<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| BillingError::Config("STRIPE_SECRET_KEY not set".to_string()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| BillingError::Config("STRIPE_WEBHOOK_SECRET not set".to_string()))?;

        let price = |var: &str| std::env::var(var).unwrap_or_default();

        Ok(Self {
            secret_key,
            webhook_secret,
            price_ids: PriceIds {
                academic_monthly: price("STRIPE_PRICE_ACADEMIC_MONTHLY"),
                academic_annual: price("STRIPE_PRICE_ACADEMIC_ANNUAL"),
                professional_monthly: price("STRIPE_PRICE_PROFESSIONAL_MONTHLY"),
                professional_annual: price("STRIPE_PRICE_PROFESSIONAL_ANNUAL"),
                enterprise_monthly: price("STRIPE_PRICE_ENTERPRISE_MONTHLY"),
                enterprise_annual: price("STRIPE_PRICE_ENTERPRISE_ANNUAL"),
            },
        })
    }
}

/// Shared Stripe client carrying its configuration
#[derive(Clone)]
pub struct StripeClient {
    client: stripe::Client,
    config: Arc<StripeConfig>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        let client = stripe::Client::new(config.secret_key.clone());
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn from_env() -> BillingResult<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    /// Access the underlying async-stripe client
    pub fn inner(&self) -> &stripe::Client {
        &self.client
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }
}
