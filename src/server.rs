/// Server setup and initialization
///
/// Wires together the database, the persistence gateway and the HTTP routes.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{create_comment_routes, create_workflow_routes, AppState},
    config::Config,
    workflow::{database, storage::SqliteStore},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Opens (and if needed creates) the database, then builds the router on top of it.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🗄️ Initializing workflow database in {}", config.database.data_dir);
    let pool = database::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open workflow database: {}", e))?;

    let state = AppState {
        store: Arc::new(SqliteStore::new(pool)),
    };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = build_router(state);

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Router over an already constructed state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        .merge(create_workflow_routes())
        .merge(create_comment_routes())
        .with_state(state)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Stepway server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
