//! Complaint Intake API Server
//!
//! Registers reporter profiles and classifies cybercrime complaints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    COMPLAINT INTAKE API                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │ Profiles  │  │  Complaints   │  │  Health             │ │
//! │  │ (Axum)    │  │  (intake-core)│  │                     │ │
//! │  └─────┬─────┘  └───────┬───────┘  └─────────────────────┘ │
//! │        ▼                ▼                                   │
//! │  ┌─────────────┐  ┌──────────────────┐                     │
//! │  │ PostgreSQL  │  │ ML classifier    │ ── fallback policy  │
//! │  │ / memory    │  │ (HTTP, external) │    when unavailable │
//! │  └─────────────┘  └──────────────────┘                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod store;
mod error;

#[cfg(test)]
mod test_support;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
};
use anyhow::Context;
use intake_core::ComplaintClassifier;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

use config::ProfileBackend;
use store::{MemoryProfileStore, PgProfileStore, ProfileStore};

pub use error::{AppError, AppResult};

/// Maximum accepted JSON body
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Complaint intake server starting...");

    let profiles: Arc<dyn ProfileStore> = match config.profile_backend {
        ProfileBackend::Postgres => {
            tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

            let pool = db::create_pool(&config.database_url).await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await
                .context("Failed to run migrations")?;

            Arc::new(PgProfileStore::new(pool))
        }
        ProfileBackend::Memory => {
            tracing::warn!("Using in-memory profile store; profiles are lost on restart");
            Arc::new(MemoryProfileStore::new())
        }
    };

    let classifier = ComplaintClassifier::new(config.classifier_config())
        .context("Failed to initialize classifier client")?;
    tracing::info!(
        endpoint = classifier.endpoint(),
        timeout_secs = config.classifier_timeout_secs,
        "Classifier configured"
    );

    // Build application state
    let state = AppState {
        profiles,
        classifier: Arc::new(classifier),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON logs in production, human-readable otherwise
fn init_tracing(config: &config::Config) {
    let json = config.is_production();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "intake_server=debug,intake_core=info,tower_http=debug".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub classifier: Arc<ComplaintClassifier>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/api/health", get(handlers::health::check))

        // Profiles
        .route("/api/profiles", post(handlers::profiles::create))
        .route("/api/profiles/email/:email", get(handlers::profiles::get_by_email))
        .route("/api/profiles/:id", get(handlers::profiles::get))

        // Complaints
        .route("/api/complaints", post(handlers::complaints::submit))
        .route("/api/complaints/:id", get(handlers::complaints::get))

        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
        )
        .with_state(state)
}

/// CORS restricted to the configured front-end origins, with credentials
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
