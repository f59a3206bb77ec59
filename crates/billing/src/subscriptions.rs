//! Subscription creation
//!
//! External state is created before local state: Stripe customer and
//! subscription first, then the local ledger row. A Stripe failure therefore
//! leaves no orphaned local record. A crash between the Stripe call and the
//! local insert leaves an external subscription with no ledger row; the
//! webhook handler closes that gap on the next processor event.

use std::collections::HashMap;

use scholarly_shared::{BillingPeriod, Subscription as SubscriptionRecord, SubscriptionTier};
use sqlx::PgPool;
use stripe::{
    CreateCustomer, CreateSubscription, CreateSubscriptionItems, CustomerInvoiceSettings,
    Customer, Subscription,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::client::StripeClient;
use crate::error::{BillingError, BillingResult};
use crate::pricing;

/// Result of a successful subscription creation
#[derive(Debug, Clone, serde::Serialize)]
pub struct CreatedSubscription {
    pub stripe_subscription_id: String,
    pub status: String,
    pub tier: SubscriptionTier,
    pub amount_cents: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub current_period_end: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
struct UserBillingRow {
    email: String,
}

/// Subscription service for creating Stripe-backed subscriptions
pub struct SubscriptionService {
    stripe: StripeClient,
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(stripe: StripeClient, pool: PgPool) -> Self {
        Self { stripe, pool }
    }

    /// Create a subscription for a user.
    ///
    /// Tier and billing period are validated against the fixed price table
    /// before anything else happens; an unknown plan never reaches Stripe or
    /// the database. Two concurrent calls for the same user are not
    /// serialized; each validates and calls Stripe independently.
    pub async fn create_subscription(
        &self,
        user_id: Uuid,
        tier: &str,
        billing_period: &str,
        payment_method_id: &str,
    ) -> BillingResult<CreatedSubscription> {
        let tier = SubscriptionTier::parse(tier)
            .ok_or_else(|| BillingError::InvalidTier(tier.to_string()))?;
        let period = BillingPeriod::parse(billing_period)
            .ok_or_else(|| BillingError::InvalidBillingPeriod(billing_period.to_string()))?;
        let amount = pricing::amount_cents(tier, period);

        let user: UserBillingRow = sqlx::query_as("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(BillingError::UserNotFound(user_id))?;

        let customer = self.create_customer(&user.email, payment_method_id).await?;
        let subscription = self
            .create_stripe_subscription(user_id, &customer, tier, period)
            .await?;

        let period_start = OffsetDateTime::from_unix_timestamp(subscription.current_period_start)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());
        let period_end = OffsetDateTime::from_unix_timestamp(subscription.current_period_end)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());

        let record: SubscriptionRecord = sqlx::query_as(
            r#"
            INSERT INTO subscriptions
                (user_id, stripe_subscription_id, tier, status, billing_period,
                 current_period_start, current_period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, stripe_subscription_id, tier, status, billing_period,
                      current_period_start, current_period_end, created_at
            "#,
        )
        .bind(user_id)
        .bind(subscription.id.as_str())
        .bind(tier.as_str())
        .bind(subscription.status.to_string())
        .bind(period.as_str())
        .bind(period_start)
        .bind(period_end)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query("UPDATE users SET tier = $1, subscription_status = 'active' WHERE id = $2")
            .bind(tier.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            user_id = %user_id,
            subscription_id = %subscription.id,
            ledger_id = %record.id,
            tier = %tier,
            billing_period = %period,
            amount_cents = amount,
            "Created subscription"
        );

        Ok(CreatedSubscription {
            stripe_subscription_id: record
                .stripe_subscription_id
                .unwrap_or_else(|| subscription.id.to_string()),
            status: record.status,
            tier,
            amount_cents: amount,
            current_period_end: record.current_period_end.unwrap_or(period_end),
        })
    }

    async fn create_customer(
        &self,
        email: &str,
        payment_method_id: &str,
    ) -> BillingResult<Customer> {
        let payment_method = payment_method_id
            .parse()
            .map_err(|e| BillingError::StripeApi(format!("Invalid payment method ID: {}", e)))?;

        let params = CreateCustomer {
            email: Some(email),
            payment_method: Some(payment_method),
            invoice_settings: Some(CustomerInvoiceSettings {
                default_payment_method: Some(payment_method_id.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        Ok(Customer::create(self.stripe.inner(), params).await?)
    }

    async fn create_stripe_subscription(
        &self,
        user_id: Uuid,
        customer: &Customer,
        tier: SubscriptionTier,
        period: BillingPeriod,
    ) -> BillingResult<Subscription> {
        let price_id = self.stripe.config().price_ids.for_plan(tier, period);
        if price_id.is_empty() {
            return Err(BillingError::Config(format!(
                "No Stripe price configured for {} / {}",
                tier, period
            )));
        }

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user_id.to_string());
        metadata.insert("tier".to_string(), tier.as_str().to_string());

        let mut params = CreateSubscription::new(customer.id.clone());
        params.items = Some(vec![CreateSubscriptionItems {
            price: Some(price_id.to_string()),
            quantity: Some(1),
            ..Default::default()
        }]);
        params.metadata = Some(metadata);

        Ok(Subscription::create(self.stripe.inner(), params).await?)
    }
}
