use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Instagram Graph API
    pub instagram_business_account_id: Option<String>,
    pub instagram_access_token: Option<String>,
    pub instagram_api_url: String,

    // Proxy behaviour
    pub reels_cache_seconds: u64,
    pub token_refresh_schedule: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Instagram - both are optional, the reels gallery falls back without them
            instagram_business_account_id: non_empty_var("INSTAGRAM_BUSINESS_ACCOUNT_ID"),
            instagram_access_token: non_empty_var("INSTAGRAM_ACCESS_TOKEN"),
            instagram_api_url: std::env::var("INSTAGRAM_API_URL")
                .unwrap_or_else(|_| "https://graph.instagram.com".to_string()),

            // Graph API responses are revalidated hourly
            reels_cache_seconds: match std::env::var("REELS_CACHE_SECONDS") {
                Ok(v) => v.parse().context("REELS_CACHE_SECONDS must be a number of seconds")?,
                Err(_) => 3600,
            },
            // Long-lived tokens expire after 60 days, refresh weekly (Sunday 03:00 UTC)
            token_refresh_schedule: std::env::var("TOKEN_REFRESH_SCHEDULE")
                .unwrap_or_else(|_| "0 0 3 * * Sun".to_string()),

            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },
        })
    }

    /// Whether both Graph API credentials are present.
    pub fn instagram_configured(&self) -> bool {
        self.instagram_business_account_id.is_some() && self.instagram_access_token.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
