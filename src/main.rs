//! Gocilla Dashboard
//!
//! Hosts the dashboard pages of the Gocilla CI server as bindable view-models,
//! backed by the Gocilla REST API.

mod api;
mod client;
mod config;
mod controllers;
mod errors;
mod models;
mod routes;
mod services;
mod session;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::ResourceClient;
use config::Config;
use routes::RouteTable;
use session::Session;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
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

    tracing::info!("Starting Gocilla dashboard");
    tracing::info!("Backend API: {}", config.api_url);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Request timeout: {:?}", config.request_timeout);

    let client = ResourceClient::new(config.api_url.clone(), config.request_timeout)?;
    let routes = RouteTable::gocilla().case_insensitive(config.case_insensitive_routes);

    let state = AppState {
        session: Arc::new(Session::new(client, routes)),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Dashboard listening on {}", config.bind_addr);

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

    let session_routes = Router::new()
        // Pages
        .route("/view", get(api::current_view))
        .route("/navigate", post(api::navigate))
        // Actions
        .route("/actions", post(api::apply_action))
        .route("/actions/hook", post(api::switch_hook))
        .route("/actions/env-vars", post(api::add_env_var))
        .route("/actions/env-vars/{index}", delete(api::delete_env_var))
        .route("/actions/submit", post(api::submit))
        .route("/actions/cancel", post(api::cancel))
        // Account
        .route("/profile", get(api::profile))
        .route("/login", get(api::login))
        .route("/logout", post(api::logout));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/session", session_routes)
        .merge(health_routes)
        .fallback(api::render_page)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
