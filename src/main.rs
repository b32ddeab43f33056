/// Stepway: workflow, step and comment backend
///
/// Main entry point for the Stepway server. Initializes configuration and starts
/// the HTTP server.

use stepway::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Workflow management API at /api/workflows/*
/// - Comment API at /api/comments/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3005 and data/stepway.db)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
