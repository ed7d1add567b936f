//! Marigold Market API - Storefront JSON API.
//!
//! This binary serves the storefront API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies
//! - `PostgreSQL` via sqlx when `MARIGOLD_DATABASE_URL` is set; an
//!   in-memory store with a preseeded catalog otherwise
//! - Stripe payment intents when `STRIPE_SECRET_KEY` is set; deterministic
//!   simulated intents otherwise
//! - Cookie sessions via tower-sessions (Postgres or in-memory store)
//!
//! Both fallbacks are explicit startup decisions: workflows only ever see
//! the `Store` and `PaymentGateway` traits.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marigold_api::config::AppConfig;
use marigold_api::middleware::create_session_layer;
use marigold_api::state::AppState;
use marigold_api::store::{MemoryStore, PgStore, create_pool};
use marigold_api::{payments, routes};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marigold_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let app = build_app(config.clone()).await;

    // Sentry layers (outermost for full request coverage)
    let app = app
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("marigold-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Select store and gateway from configuration and build the router.
///
/// NOTE: Schema migrations are NOT run automatically on startup.
/// Run them explicitly via: `cargo run -p marigold-cli -- migrate`
async fn build_app(config: AppConfig) -> Router {
    let gateway = payments::from_config(&config.stripe);

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            let session_store = tower_sessions_sqlx_store::PostgresStore::new(pool.clone());
            let session_layer = create_session_layer(session_store, &config);

            let store = Arc::new(PgStore::new(pool));
            let state = AppState::new(config, store, gateway);

            routes::router(state, session_layer)
        }
        None => {
            tracing::warn!("No database configured - using in-memory store");

            let session_store = tower_sessions::MemoryStore::default();
            let session_layer = create_session_layer(session_store, &config);

            let store = Arc::new(MemoryStore::new());
            let state = AppState::new(config, store, gateway);

            routes::router(state, session_layer)
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
