//! Stripe webhook endpoint

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// POST /webhooks/stripe
///
/// The raw body is required for signature verification; axum's `String`
/// extractor hands it over untouched.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<Value>> {
    let billing = state.billing.as_ref().ok_or(ApiError::Unavailable)?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Stripe webhook missing signature header");
            ApiError::InvalidSignature
        })?;

    let event = billing.webhooks.verify_event(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Stripe webhook signature verification failed");
        ApiError::InvalidSignature
    })?;

    tracing::info!(
        event_type = %event.type_,
        event_id = %event.id,
        "Stripe webhook event verified"
    );

    billing.webhooks.handle_event(event).await?;

    Ok(Json(json!({ "received": true })))
}
