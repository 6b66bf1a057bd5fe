//! Demo nutrition backend: pantry inventory, food-catalog search, and a
//! deterministic diet-plan generator. Mock data only; nothing persists past
//! the process.
//!
//! # Endpoints
//! - `GET /api/health` — liveness probe
//! - `GET /api/pantry` — inventory list, newest first; fails transiently at a
//!   configured rate to exercise client failover
//! - `POST /api/pantry` — add an item (generated id + timestamp, prepended)
//! - `GET /api/foods/search?q=` — substring search over the static catalog;
//!   also transiently failure-injected
//! - `POST /api/diet/week`, `POST /api/diet/month` — cyclic plan generation
//! - `GET /fallback/*` — static canned bodies the failover client points at;
//!   never failure-injected
//!
//! # Configuration
//! Environment variables, all optional: `RUST_PORT`, `DATA_DIR`,
//! `PANTRY_FAILURE_RATE`, `SEARCH_FAILURE_RATE`, `FAILURE_SEED`. Set
//! `FAILURE_SEED` to make the injected failures reproducible.
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod catalog;
pub mod config;
pub mod error;
pub mod failure;
pub mod models;
pub mod planner;
pub mod routes;
pub mod state;

use routes::{
    diet_month_handler, diet_week_handler, food_search_handler, health_handler,
    pantry_add_handler, pantry_list_handler,
};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let fallback_files = ServeDir::new(state.config.data_dir.clone());

    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/pantry",
            get(pantry_list_handler).post(pantry_add_handler),
        )
        .route("/api/foods/search", get(food_search_handler))
        .route("/api/diet/week", post(diet_week_handler))
        .route("/api/diet/month", post(diet_month_handler))
        .nest_service("/fallback", fallback_files)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
