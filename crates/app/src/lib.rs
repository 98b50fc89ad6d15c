//! Classhub application composition root
//!
//! Picks the Team Store backend, wires it into the teams domain, and adds
//! the shared infrastructure routes.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use classhub_auth::{AuthBackend, AuthConfig};
use classhub_common::{Config, StoreBackend};
use classhub_teams::{InMemoryTeamStore, PgTeamStore, TeamService, TeamStore, TeamsState};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Largest request body accepted; every payload here is a small JSON object
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the Team Store selected by `STORE_BACKEND`
pub async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn TeamStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory team store");
            Ok(Arc::new(InMemoryTeamStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres"))?;

            let pool = PgPool::connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            info!("Database connection established");

            PgTeamStore::migrate(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
            info!("Database migrations applied");

            Ok(Arc::new(PgTeamStore::new(pool)))
        }
    }
}

/// Create the main application router with all routes
pub async fn create_app(config: &Config) -> anyhow::Result<Router> {
    let store = create_store(config).await?;
    let auth = AuthBackend::new(AuthConfig::from(config));

    Ok(build_router(TeamsState::new(TeamService::new(store), auth)))
}

/// Compose domain routers with shared infrastructure routes
pub fn build_router(teams_state: TeamsState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Classhub API v0.0.1-SNAPSHOT" }),
        )
        .merge(classhub_teams::routes().with_state(teams_state))
}

/// CORS for the web client. `*` allows any origin; otherwise a
/// comma-separated list of exact origins.
pub fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
