//! API error taxonomy
//!
//! Every failure is surfaced directly to the caller; there are no retries
//! and no transient/permanent distinction.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use scholarly_billing::BillingError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/invalid/expired token or bad login credentials
    #[error("Invalid authentication credentials")]
    Unauthorized,

    /// Authenticated but lacking the required role
    #[error("Admin access required")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    /// Duplicate registration
    #[error("User already exists")]
    Conflict,

    #[error("{0}")]
    Validation(String),

    /// Processor rejection; the message is the processor's, verbatim
    #[error("{0}")]
    PaymentFailed(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Datastore unavailable (pool exhausted or closed)
    #[error("Service unavailable")]
    Unavailable,

    #[error("Database error: {0}")]
    Database(String),

    /// Failure in the research search path; message passed through
    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict
            | ApiError::Validation(_)
            | ApiError::PaymentFailed(_)
            | ApiError::InvalidSignature => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::SearchFailed(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ApiError::Unavailable,
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidTier(t) => ApiError::Validation(format!("Invalid tier: {}", t)),
            BillingError::InvalidBillingPeriod(p) => {
                ApiError::Validation(format!("Invalid billing period: {}", p))
            }
            BillingError::UserNotFound(_) => ApiError::NotFound,
            BillingError::PaymentFailed(msg) => ApiError::PaymentFailed(msg),
            BillingError::WebhookSignatureInvalid | BillingError::WebhookEventNotSupported(_) => {
                ApiError::InvalidSignature
            }
            BillingError::Database(e) => ApiError::from(e),
            BillingError::StripeApi(msg) => ApiError::PaymentFailed(msg),
            BillingError::Config(msg) => ApiError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PaymentFailed("declined".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::SearchFailed("engine down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn processor_message_passes_through_verbatim() {
        let err = ApiError::from(scholarly_billing::BillingError::PaymentFailed(
            "Your card was declined.".to_string(),
        ));
        assert_eq!(err.to_string(), "Your card was declined.");
    }

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolTimedOut),
            ApiError::Unavailable
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolClosed),
            ApiError::Unavailable
        ));
    }
}
