//! Router assembly and storage wiring

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use secrest_shared_config::CredentialsConfig;
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Config, StorageBackend};
use crate::middleware::require_basic_auth;
use crate::repositories::{MemoryPrivilegeRepository, PgPrivilegeRepository, PrivilegeRepository};
use crate::routes::{health_router, privilege_router, HealthState, PrivilegeState, PRIVILEGES_PATH};

/// Build the application router over a privilege store
///
/// Health routes are public; everything under `/api` requires the given
/// Basic credentials.
pub fn build_router(
    repository: Arc<dyn PrivilegeRepository>,
    credentials: CredentialsConfig,
) -> Router {
    let health_state = HealthState::new(repository.clone());
    let privilege_state = PrivilegeState::new(repository);

    let privileges = privilege_router(privilege_state).layer(middleware::from_fn_with_state(
        Arc::new(credentials),
        require_basic_auth,
    ));

    Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(health_state))
        // Privilege REST routes: /api/privileges, /api/privileges/:id
        .nest(PRIVILEGES_PATH, privileges)
        .layer(TraceLayer::new_for_http())
}

/// Open the configured privilege store
///
/// For PostgreSQL this connects the pool and runs pending migrations.
pub async fn connect_repository(config: &Config) -> Result<Arc<dyn PrivilegeRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; privileges are lost on shutdown");
            Ok(Arc::new(MemoryPrivilegeRepository::new()))
        }
        StorageBackend::Postgres => {
            let database = config.database();
            tracing::info!("Connecting to database...");

            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(database.connect_timeout_secs))
                .idle_timeout(Duration::from_secs(database.idle_timeout_secs))
                .connect(&database.url)
                .await?;

            tracing::info!("Database connection established");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations completed successfully");

            Ok(Arc::new(PgPrivilegeRepository::new(pool)))
        }
    }
}

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    let is_production = config.is_production();

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([
                        header::AUTHORIZATION,
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                        header::ORIGIN,
                    ])
                    .expose_headers([header::LOCATION, header::LINK])
                    .allow_credentials(true)
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

async fn root() -> &'static str {
    "SecRest privilege API"
}
