//! Registration and login

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use scholarly_shared::academic::{academic_discount_percentage, is_academic_email};

use crate::{
    auth::{hash_password, verify_password},
    error::{ApiError, ApiResult},
    state::AppState,
};

fn default_role() -> String {
    "researcher".to_string()
}

/// Map a failed registration insert. A unique violation means the email is
/// already registered and becomes `Conflict`; everything else keeps the
/// standard database mapping.
fn map_registration_error(e: sqlx::Error) -> ApiError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        ApiError::Conflict
    } else {
        ApiError::from(e)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub institution: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub token_type: &'static str,
    pub is_academic: bool,
    pub discount_percentage: f32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user_id: Uuid,
    pub tier: String,
    pub subscription_status: String,
}

#[derive(Debug, FromRow)]
struct LoginRow {
    id: Uuid,
    password_hash: String,
    tier: String,
    subscription_status: String,
}

/// POST /auth/register - create a user with academic-discount detection
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password must not be empty".to_string()));
    }
    if payload.role != "researcher" && payload.role != "admin" {
        return Err(ApiError::Validation(format!("Invalid role: {}", payload.role)));
    }

    let is_academic = is_academic_email(&payload.email);
    let discount = academic_discount_percentage(&payload.email);
    let password_hash = hash_password(&payload.password).map_err(|_| ApiError::Internal)?;

    // The unique constraint on email is the authority; a concurrent
    // registration for the same address loses with a unique violation.
    let user_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, password_hash, institution, role, is_academic, discount_percentage)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.institution)
    .bind(&payload.role)
    .bind(is_academic)
    .bind(discount)
    .fetch_one(&state.pool)
    .await
    .map_err(map_registration_error)?;

    let access_token = state
        .jwt_manager
        .create_access_token(user_id)
        .map_err(|_| ApiError::Internal)?;

    tracing::info!(
        user_id = %user_id,
        is_academic = is_academic,
        "User registered"
    );

    Ok(Json(RegisterResponse {
        user_id,
        access_token,
        token_type: "bearer",
        is_academic,
        discount_percentage: discount,
    }))
}

/// POST /auth/login - verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user: Option<LoginRow> = sqlx::query_as(
        "SELECT id, password_hash, tier, subscription_status FROM users WHERE email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await?;

    // A missing user and a wrong password are indistinguishable to the caller
    let user = user.ok_or(ApiError::Unauthorized)?;
    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    sqlx::query("UPDATE users SET last_active = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    let access_token = state
        .jwt_manager
        .create_access_token(user.id)
        .map_err(|_| ApiError::Internal)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user_id: user.id,
        tier: user.tier,
        subscription_status: user.subscription_status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.message())
        }
    }

    impl StdError for StubDbError {}

    impl DatabaseError for StubDbError {
        fn message(&self) -> &str {
            if self.unique {
                "duplicate key value violates unique constraint \"users_email_key\""
            } else {
                "relation is read only"
            }
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(if self.unique { "23505" } else { "XX000" }))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn duplicate_email_maps_to_conflict() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: true }));
        assert!(matches!(map_registration_error(err), ApiError::Conflict));
    }

    #[test]
    fn other_database_errors_keep_the_standard_mapping() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: false }));
        assert!(matches!(map_registration_error(err), ApiError::Database(_)));
    }

    #[test]
    fn pool_exhaustion_maps_to_unavailable() {
        assert!(matches!(
            map_registration_error(sqlx::Error::PoolTimedOut),
            ApiError::Unavailable
        ));
    }
}
