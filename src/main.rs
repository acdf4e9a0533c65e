use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use valavaara::config::Config;
use valavaara::instagram::InstagramClient;
use valavaara::scheduler;
use valavaara::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("valavaara=info".parse()?)
        )
        .init();

    info!("Starting Valavaara media service");

    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    if !config.instagram_configured() {
        info!("Instagram credentials not set, reels endpoint will return an empty list");
    }

    let client = InstagramClient::from_config(&config)?;

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = scheduler::start_scheduler(Arc::clone(&config), client.clone()).await?;

    let state = Arc::new(AppState::new(client, config.reels_cache_seconds));
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✓ Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
