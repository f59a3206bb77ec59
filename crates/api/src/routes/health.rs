//! Root and health endpoints

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::state::AppState;

/// GET / - service banner
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Scholarly Research Platform API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "environment": state.config.environment,
    }))
}

/// GET /health - connectivity check for the database and Redis.
/// Reports "degraded" rather than failing the request when a backend is down.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let mut status = "healthy";
    let mut services = serde_json::Map::new();

    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => {
            services.insert("database".to_string(), json!("connected"));
        }
        Err(e) => {
            services.insert("database".to_string(), json!(format!("error: {}", e)));
            status = "degraded";
        }
    }

    if let Some(client) = &state.redis {
        match ping_redis(client).await {
            Ok(()) => {
                services.insert("redis".to_string(), json!("connected"));
            }
            Err(e) => {
                services.insert("redis".to_string(), json!(format!("error: {}", e)));
                status = "degraded";
            }
        }
    }

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": status,
        "timestamp": timestamp,
        "services": services,
    }))
}

async fn ping_redis(client: &redis::Client) -> Result<(), redis::RedisError> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
