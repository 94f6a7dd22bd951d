//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{
    Router, http,
    http::{Method, header},
};
use chrono::Utc;
use gridboard::store::AccountRepository;
use gridboard::{
    GridboardConfig, LogResetNotifier, MemoryStore, PgStore, gridboard_router,
    gridboard_router_generic,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gridboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    let gridboard = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);

            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(&database_url)
                .await?;

            tracing::info!(max_connections, "Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let store = PgStore::new(pool);

            // Startup cleanup: drop stale reset tickets
            // Errors here should not prevent server startup
            if let Err(e) = store.purge_expired_reset_tickets(Utc::now()).await {
                tracing::warn!(
                    error = %e,
                    "Reset ticket cleanup failed, continuing anyway"
                );
            }

            gridboard_router(store, config)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            gridboard_router_generic(MemoryStore::new(), config, Arc::new(LogResetNotifier))
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .merge(gridboard)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Gridboard configuration from the environment
fn load_config() -> anyhow::Result<GridboardConfig> {
    let mut config = if cfg!(debug_assertions) {
        GridboardConfig::development()
    } else {
        GridboardConfig::default()
    };

    if let Ok(reset_url_base) = env::var("RESET_URL_BASE") {
        config = config.with_reset_url_base(reset_url_base);
    }

    if let Ok(pepper_b64) = env::var("PASSWORD_PEPPER") {
        let pepper = platform::crypto::from_base64(pepper_b64.trim())?;
        anyhow::ensure!(!pepper.is_empty(), "PASSWORD_PEPPER must not be empty");
        config = config.with_pepper(pepper);
    } else if !cfg!(debug_assertions) {
        tracing::warn!("PASSWORD_PEPPER not set, hashing without a pepper");
    }

    Ok(config)
}
