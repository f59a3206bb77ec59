//! User profile endpoint

use axum::extract::{Extension, State};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use scholarly_shared::User;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub institution: Option<String>,
    pub role: String,
    pub tier: String,
    pub subscription_status: String,
    pub is_academic: bool,
    pub discount_percentage: f32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
    pub monthly_usage: serde_json::Value,
}

/// GET /users/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let user: Option<User> = sqlx::query_as(
        r#"
        SELECT id, email, password_hash, institution, role, tier, subscription_status,
               is_academic, discount_percentage, created_at, last_active, monthly_usage
        FROM users WHERE id = $1
        "#,
    )
    .bind(auth_user.user_id)
    .fetch_optional(&state.pool)
    .await?;

    let user = user.ok_or(ApiError::NotFound)?;

    Ok(Json(ProfileResponse {
        user_id: user.id,
        email: user.email,
        institution: user.institution,
        role: user.role,
        tier: user.tier,
        subscription_status: user.subscription_status,
        is_academic: user.is_academic,
        discount_percentage: user.discount_percentage,
        created_at: user.created_at,
        last_active: user.last_active,
        monthly_usage: user.monthly_usage,
    }))
}
