//! Subscription creation endpoint

use axum::extract::{Extension, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub tier: String,
    pub billing_period: String,
    pub payment_method_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub subscription_id: String,
    pub status: String,
    pub tier: String,
    /// Amount in cents from the fixed price table
    pub amount: i64,
    pub current_period_end: String,
}

/// POST /subscriptions/create
pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> ApiResult<Json<CreateSubscriptionResponse>> {
    let billing = state.billing.as_ref().ok_or(ApiError::Unavailable)?;

    let created = billing
        .subscriptions
        .create_subscription(
            auth_user.user_id,
            &payload.tier,
            &payload.billing_period,
            &payload.payment_method_id,
        )
        .await?;

    let current_period_end = created
        .current_period_end
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();

    Ok(Json(CreateSubscriptionResponse {
        subscription_id: created.stripe_subscription_id,
        status: created.status,
        tier: created.tier.to_string(),
        amount: created.amount_cents,
        current_period_end,
    }))
}
