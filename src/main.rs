use std::sync::Arc;

use loyalty_analysis_api::api;
use loyalty_analysis_api::config::Config;
use loyalty_analysis_api::handlers::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the completion client
/// and serves the router on all interfaces.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loyalty_analysis_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let app_state = AppState::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize completion client: {}", e))?;
    tracing::info!(
        "✓ Completion client initialized: {} ({})",
        config.openai_base_url,
        app_state.completion_client.model()
    );

    let app = api::router(Arc::new(app_state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
