// Billing crate clippy configuration
#![allow(clippy::result_large_err)] // BillingError carries processor messages
// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Scholarly Billing Module
//!
//! Stripe integration for the research platform:
//!
//! - **Subscription creation**: customer + subscription at a fixed price table
//! - **Webhooks**: signature verification and subscription-state reconciliation
//! - **Pricing**: the tier × billing-period amount table

pub mod client;
pub mod error;
pub mod pricing;
pub mod subscriptions;
pub mod webhooks;


pub use client::{PriceIds, StripeClient, StripeConfig};
pub use error::{BillingError, BillingResult};
pub use pricing::{amount_cents, monthly_revenue_dollars};
pub use subscriptions::{CreatedSubscription, SubscriptionService};
pub use webhooks::WebhookHandler;

use sqlx::PgPool;

/// Main billing service combining subscription creation and webhook handling
pub struct BillingService {
    pub subscriptions: SubscriptionService,
    pub webhooks: WebhookHandler,
}

impl BillingService {
    /// Create a new billing service from environment variables
    pub fn from_env(pool: PgPool) -> BillingResult<Self> {
        let stripe = StripeClient::from_env()?;
        Ok(Self::with_client(stripe, pool))
    }

    /// Create a new billing service with explicit config
    pub fn new(config: StripeConfig, pool: PgPool) -> Self {
        Self::with_client(StripeClient::new(config), pool)
    }

    fn with_client(stripe: StripeClient, pool: PgPool) -> Self {
        Self {
            subscriptions: SubscriptionService::new(stripe.clone(), pool.clone()),
            webhooks: WebhookHandler::new(stripe, pool),
        }
    }
}
