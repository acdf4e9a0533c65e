use anyhow::{Context, Result};
use tracing::info;
use valavaara::{config, instagram::InstagramClient, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fetch_reels=info".parse()?)
                .add_directive("valavaara=info".parse()?)
        )
        .init();

    let limit = server::parse_limit(std::env::args().nth(1).as_deref());
    info!("Fetching up to {} reels from Instagram", limit);

    // Load config from environment
    let config = config::Config::from_env()?;
    if !config.instagram_configured() {
        anyhow::bail!("INSTAGRAM_BUSINESS_ACCOUNT_ID and INSTAGRAM_ACCESS_TOKEN must be set");
    }

    let client = InstagramClient::from_config(&config)?;
    let reels = client
        .fetch_reels(limit)
        .await
        .context("Failed to fetch reels")?;

    println!("{}", serde_json::to_string_pretty(&server::ReelsResponse::ok(reels.clone()))?);
    info!("✓ Credentials work, {} reels available", reels.len());

    Ok(())
}
