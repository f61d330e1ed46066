//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request handling errors are rendered by
//! the feature crates.

use std::net::SocketAddr;

use auth::{AuthAppState, AuthConfig, PgUserRepository, auth_router};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use platform::config::{env_list, env_parse, require_env};
use sqlx::postgres::PgPoolOptions;
use staging::{PgBatchWriter, StagingAppState, StagingConfig, staging_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &[&str] = &["http://localhost:40922", "http://127.0.0.1:40922"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,staging=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration is validated before anything is started
    let database_url = require_env("DATABASE_URL")?;
    let bind_addr: SocketAddr = env_parse("BIND_ADDR", DEFAULT_BIND_ADDR.parse()?)?;
    let auth_config = AuthConfig::from_env()?;
    let staging_config = StagingConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // In-memory runtimes: nonce registry, denylist, staging store
    let auth_state = AuthAppState::new(PgUserRepository::new(pool.clone()), &auth_config)?;
    let staging_state = StagingAppState::new(
        PgBatchWriter::new(pool.clone()),
        auth_state.tokens.clone(),
        &staging_config,
    )?;

    tracing::info!(
        nonce_ttl_secs = auth_config.nonce_ttl.as_secs(),
        access_ttl_secs = auth_config.access_token_ttl.as_secs(),
        staging_ttl_secs = staging_config.cache_ttl.as_secs(),
        "Auth and staging runtimes started"
    );

    // CORS configuration
    let allowed_origins: Vec<HeaderValue> = env_list("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/api/staging", staging_router(staging_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Server has drained; stop background sweeps
    staging_state.shutdown();
    auth_state.shutdown();
    pool.close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // keep serving; the process can still be killed
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
