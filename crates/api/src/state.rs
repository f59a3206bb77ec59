//! Application state

use std::sync::Arc;

use sqlx::PgPool;

use scholarly_billing::BillingService;

use crate::{
    auth::{AuthState, JwtManager},
    config::Config,
    search::ResearchClient,
};

/// Shared application state, cloned per request.
///
/// Every handle is constructed here at startup and injected; no component
/// reaches for process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub jwt_manager: JwtManager,
    /// Billing service (None when Stripe env vars are not configured)
    pub billing: Option<Arc<BillingService>>,
    /// Redis client, used only for health reporting
    pub redis: Option<redis::Client>,
    pub research: ResearchClient,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_expiry_hours);

        let billing = match BillingService::from_env(pool.clone()) {
            Ok(svc) => {
                tracing::info!("Stripe billing service initialized");
                Some(Arc::new(svc))
            }
            Err(e) => {
                tracing::warn!("Stripe billing not configured: {}", e);
                None
            }
        };

        let redis = match &config.redis_url {
            Some(url) => match redis::Client::open(url.as_str()) {
                Ok(client) => {
                    tracing::info!("Redis client initialized");
                    Some(client)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid REDIS_URL, health checks will skip Redis");
                    None
                }
            },
            None => {
                tracing::info!("REDIS_URL not set, health checks will skip Redis");
                None
            }
        };

        let research = ResearchClient::new(config.research_engine_url.clone());
        tracing::info!(
            engine_url = %config.research_engine_url,
            "Research engine client initialized"
        );

        Self {
            pool,
            config,
            jwt_manager,
            billing,
            redis,
            research,
        }
    }

    /// Get auth state for middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt_manager: self.jwt_manager.clone(),
        }
    }
}
