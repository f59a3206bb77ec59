//! Stripe webhook handling
//!
//! Verifies inbound event signatures and reconciles local subscription state
//! with what the processor reports. Verification fails closed: an event that
//! cannot be verified or parsed never touches the database.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::PgPool;
use stripe::{Event, EventObject, EventType, Subscription, Webhook};
use time::OffsetDateTime;

use crate::client::StripeClient;
use crate::error::{BillingError, BillingResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age of a webhook timestamp, in seconds
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Webhook handler for Stripe events
pub struct WebhookHandler {
    stripe: StripeClient,
    pool: PgPool,
}

impl WebhookHandler {
    pub fn new(stripe: StripeClient, pool: PgPool) -> Self {
        Self { stripe, pool }
    }

    /// Verify and parse a Stripe webhook event.
    ///
    /// Tries the async-stripe construct_event path first, then falls back to
    /// manual signature verification for API versions the library does not
    /// yet parse.
    pub fn verify_event(&self, payload: &str, signature: &str) -> BillingResult<Event> {
        let webhook_secret = &self.stripe.config().webhook_secret;

        match Webhook::construct_event(payload, signature, webhook_secret) {
            Ok(event) => return Ok(event),
            Err(e) => {
                tracing::warn!(
                    stripe_error = %e,
                    "Standard webhook parsing failed, trying manual verification"
                );
            }
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        verify_signature(payload, signature, webhook_secret, now)?;

        let event: Event = serde_json::from_str(payload).map_err(|e| {
            tracing::error!(parse_error = %e, "Failed to parse webhook event JSON");
            BillingError::WebhookSignatureInvalid
        })?;

        tracing::info!(
            event_type = %event.type_,
            event_id = %event.id,
            "Manual webhook verification succeeded"
        );

        Ok(event)
    }

    /// Handle a verified Stripe event.
    pub async fn handle_event(&self, event: Event) -> BillingResult<()> {
        tracing::info!(
            event_type = %event.type_,
            event_id = %event.id,
            "Processing Stripe webhook event"
        );

        match event.type_ {
            EventType::CustomerSubscriptionUpdated => {
                let subscription = extract_subscription(event)?;
                self.reconcile_subscription(&subscription).await?;
            }
            EventType::CustomerSubscriptionDeleted => {
                let subscription = extract_subscription(event)?;
                self.mark_subscription_canceled(&subscription).await?;
            }
            _ => {
                // Track events we receive but do not act on
                tracing::info!(
                    event_type = %event.type_,
                    event_id = %event.id,
                    "Received unhandled Stripe event type - no handler configured"
                );
            }
        }

        Ok(())
    }

    /// Mirror status and period end from the processor onto the matching
    /// local subscription. An event for an unknown subscription id is a
    /// no-op; it is logged rather than silently dropped so lost updates are
    /// visible in operations.
    async fn reconcile_subscription(&self, subscription: &Subscription) -> BillingResult<()> {
        let period_end = OffsetDateTime::from_unix_timestamp(subscription.current_period_end)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());
        let status = subscription.status.to_string();

        let rows = sqlx::query(
            r#"
            UPDATE subscriptions SET status = $1, current_period_end = $2
            WHERE stripe_subscription_id = $3
            "#,
        )
        .bind(&status)
        .bind(period_end)
        .bind(subscription.id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            tracing::warn!(
                subscription_id = %subscription.id,
                status = %status,
                "Webhook references unknown subscription id - update dropped"
            );
        } else {
            tracing::info!(
                subscription_id = %subscription.id,
                status = %status,
                period_end = %period_end,
                "Reconciled subscription from webhook"
            );
        }

        Ok(())
    }

    async fn mark_subscription_canceled(&self, subscription: &Subscription) -> BillingResult<()> {
        let rows = sqlx::query(
            "UPDATE subscriptions SET status = 'canceled' WHERE stripe_subscription_id = $1",
        )
        .bind(subscription.id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            tracing::warn!(
                subscription_id = %subscription.id,
                "Cancellation webhook references unknown subscription id"
            );
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE users SET subscription_status = 'canceled'
            WHERE id = (SELECT user_id FROM subscriptions WHERE stripe_subscription_id = $1)
            "#,
        )
        .bind(subscription.id.as_str())
        .execute(&self.pool)
        .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            "Subscription canceled via webhook"
        );

        Ok(())
    }
}

fn extract_subscription(event: Event) -> BillingResult<Subscription> {
    match event.data.object {
        EventObject::Subscription(subscription) => Ok(subscription),
        _ => Err(BillingError::WebhookEventNotSupported(
            "Expected Subscription".to_string(),
        )),
    }
}

/// Manual verification of the `stripe-signature` header
/// (`t=<timestamp>,v1=<hex hmac>` over `"{timestamp}.{payload}"`).
///
/// `now` is passed in so the timestamp tolerance is testable.
pub(crate) fn verify_signature(
    payload: &str,
    signature: &str,
    webhook_secret: &str,
    now: i64,
) -> BillingResult<()> {
    let mut timestamp: Option<i64> = None;
    let mut v1_signature: Option<String> = None;

    for part in signature.split(',') {
        let kv: Vec<&str> = part.splitn(2, '=').collect();
        if kv.len() == 2 {
            match kv[0] {
                "t" => timestamp = kv[1].parse().ok(),
                "v1" => v1_signature = Some(kv[1].to_string()),
                _ => {}
            }
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        tracing::error!("Missing timestamp in signature header");
        BillingError::WebhookSignatureInvalid
    })?;

    let v1_signature = v1_signature.ok_or_else(|| {
        tracing::error!("Missing v1 signature in signature header");
        BillingError::WebhookSignatureInvalid
    })?;

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        tracing::error!(
            timestamp = timestamp,
            now = now,
            "Webhook timestamp outside tolerance"
        );
        return Err(BillingError::WebhookSignatureInvalid);
    }

    // The secret's "whsec_" prefix is not part of the HMAC key
    let secret_key = webhook_secret
        .strip_prefix("whsec_")
        .unwrap_or(webhook_secret);
    let signed_payload = format!("{}.{}", timestamp, payload);

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| BillingError::WebhookSignatureInvalid)?;
    mac.update(signed_payload.as_bytes());
    let computed = hex::encode(mac.finalize().into_bytes());

    if computed != v1_signature {
        tracing::error!("Webhook signature mismatch");
        return Err(BillingError::WebhookSignatureInvalid);
    }

    Ok(())
}
