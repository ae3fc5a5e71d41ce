//! Booru Relay
//!
//! An HTTP relay for the Gelbooru API that forwards caller credentials and
//! returns post and tag records with client-friendly derived fields.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod normalizer;
mod upstream;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use upstream::{GelbooruClient, Upstream};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Booru Relay");

    let upstream = GelbooruClient::from_config(&config)?;
    tracing::info!("Upstream: {}", upstream.base_url());
    tracing::info!("Upstream timeout: {:?}", config.upstream_timeout);
    tracing::info!("Bind address: {}", config.bind_addr);

    let state = AppState {
        upstream: Arc::new(upstream),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that forward caller credentials upstream
    let guarded_routes = Router::new()
        .route("/post", get(api::list_posts))
        .route("/post/{id}", get(api::get_post))
        .route("/tag", get(api::list_tags))
        .route_layer(middleware::from_fn(auth::credential_guard));

    // Public routes (no credentials required)
    let public_routes = Router::new()
        .route("/login", post(api::login))
        .route("/image", get(api::get_image))
        .route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
