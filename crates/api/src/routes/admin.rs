//! Platform statistics for admin users

use axum::extract::{Extension, State};
use axum::Json;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use scholarly_billing::monthly_revenue_dollars;
use scholarly_shared::SubscriptionTier;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub active_subscriptions: i64,
    pub total_queries: i64,
    pub estimated_monthly_revenue: f64,
    pub timestamp: String,
}

/// Gate on the caller's role. Only an exact `admin` role passes; a missing
/// user row is treated the same as a non-admin one.
fn require_admin(role: Option<&str>) -> Result<(), ApiError> {
    if role == Some("admin") {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// GET /admin/stats
///
/// The role check runs first and on its own; a non-admin caller is rejected
/// before any statistics query executes.
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<AdminStatsResponse>> {
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(auth_user.user_id)
        .fetch_optional(&state.pool)
        .await?;

    require_admin(role.as_deref())?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;

    let active_subscriptions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE status = 'active'")
            .fetch_one(&state.pool)
            .await?;

    let total_queries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM research_queries")
        .fetch_one(&state.pool)
        .await?;

    let tier_counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT tier, COUNT(*) FROM subscriptions WHERE status = 'active' GROUP BY tier",
    )
    .fetch_all(&state.pool)
    .await?;

    let estimated_monthly_revenue = tier_counts
        .iter()
        .filter_map(|(tier, count)| {
            SubscriptionTier::parse(tier).map(|t| monthly_revenue_dollars(t) * *count as f64)
        })
        .sum();

    Ok(Json(AdminStatsResponse {
        total_users,
        active_subscriptions,
        total_queries,
        estimated_monthly_revenue,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_passes_the_gate() {
        assert!(require_admin(Some("admin")).is_ok());
    }

    #[test]
    fn researcher_role_is_forbidden() {
        assert!(matches!(
            require_admin(Some("researcher")),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn missing_user_row_is_forbidden() {
        assert!(matches!(require_admin(None), Err(ApiError::Forbidden)));
    }

    #[test]
    fn role_match_is_exact() {
        assert!(matches!(
            require_admin(Some("Admin")),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            require_admin(Some("administrator")),
            Err(ApiError::Forbidden)
        ));
    }
}
