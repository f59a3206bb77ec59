//! Route definitions

pub mod admin;
pub mod auth;
pub mod health;
pub mod research;
pub mod subscriptions;
pub mod users;
pub mod webhooks;

use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};

use crate::auth::require_auth;
use crate::state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/subscriptions/create",
            post(subscriptions::create_subscription),
        )
        .route("/research/search", post(research::search))
        .route("/users/profile", get(users::profile))
        .route("/admin/stats", get(admin::stats))
        .layer(middleware::from_fn_with_state(
            state.auth_state(),
            require_auth,
        ));

    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        .merge(protected);

    // Interactive endpoint index only outside production
    if state.config.is_development() {
        router = router.route("/docs", get(docs_index));
    }

    router.with_state(state)
}

/// GET /docs - development-only endpoint index
async fn docs_index() -> Json<Value> {
    Json(json!({
        "endpoints": [
            { "method": "GET",  "path": "/",                      "auth": "none" },
            { "method": "GET",  "path": "/health",                "auth": "none" },
            { "method": "POST", "path": "/auth/register",         "auth": "none" },
            { "method": "POST", "path": "/auth/login",            "auth": "none" },
            { "method": "POST", "path": "/subscriptions/create",  "auth": "bearer" },
            { "method": "POST", "path": "/research/search",       "auth": "bearer" },
            { "method": "GET",  "path": "/users/profile",         "auth": "bearer" },
            { "method": "GET",  "path": "/admin/stats",           "auth": "bearer (admin)" },
            { "method": "POST", "path": "/webhooks/stripe",       "auth": "stripe-signature" },
        ]
    }))
}
