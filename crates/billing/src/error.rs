//! Billing error types

use thiserror::Error;

pub type BillingResult<T> = Result<T, BillingError>;

#[derive(Debug, Error)]
pub enum BillingError {
    /// Tier not present in the fixed price table
    #[error("Invalid subscription tier: {0}")]
    InvalidTier(String),

    /// Billing period other than monthly/annual
    #[error("Invalid billing period: {0}")]
    InvalidBillingPeriod(String),

    /// User referenced by a subscription operation does not exist
    #[error("User not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Stripe rejected a billing operation; the processor message is kept
    /// verbatim so it can be passed through to the caller.
    #[error("{0}")]
    PaymentFailed(String),

    /// Webhook payload failed signature verification or could not be parsed
    #[error("Webhook signature verification failed")]
    WebhookSignatureInvalid,

    /// Webhook event carried an unexpected object type
    #[error("Unsupported webhook event: {0}")]
    WebhookEventNotSupported(String),

    #[error("Stripe API error: {0}")]
    StripeApi(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Billing configuration error: {0}")]
    Config(String),
}

impl From<stripe::StripeError> for BillingError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            // Card declines, invalid payment methods etc. come back as
            // request errors with a processor message worth surfacing.
            stripe::StripeError::Stripe(ref req_err) => BillingError::PaymentFailed(
                req_err
                    .message
                    .clone()
                    .unwrap_or_else(|| err.to_string()),
            ),
            other => BillingError::StripeApi(other.to_string()),
        }
    }
}
