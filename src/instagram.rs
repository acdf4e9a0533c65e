use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;

const MEDIA_FIELDS: &str = "id,media_type,media_url,thumbnail_url,permalink,caption,timestamp";

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("Instagram credentials not configured")]
    NotConfigured,

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Failed to send request to Instagram API: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Instagram API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramReel {
    pub id: String,
    pub media_type: String,
    #[serde(default)]
    pub media_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl InstagramReel {
    /// Only videos and reels are shown; images and carousels are skipped.
    pub fn is_video(&self) -> bool {
        self.media_type == "VIDEO" || self.media_type == "REELS"
    }
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    #[serde(default)]
    data: Vec<InstagramReel>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Graph API client for the film's business account.
///
/// The access token sits behind a lock so the scheduled refresh can swap it
/// while requests are being served.
#[derive(Debug, Clone)]
pub struct InstagramClient {
    http: reqwest::Client,
    api_url: String,
    account_id: Option<String>,
    access_token: Arc<RwLock<Option<String>>>,
}

impl InstagramClient {
    pub fn new(
        api_url: impl Into<String>,
        account_id: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self, InstagramError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(InstagramError::Client)?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            account_id,
            access_token: Arc::new(RwLock::new(access_token)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, InstagramError> {
        Self::new(
            &config.instagram_api_url,
            config.instagram_business_account_id.clone(),
            config.instagram_access_token.clone(),
        )
    }

    pub async fn is_configured(&self) -> bool {
        self.account_id.is_some() && self.access_token.read().await.is_some()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Latest `limit` media items of the account, reels and videos only.
    pub async fn fetch_reels(&self, limit: u32) -> Result<Vec<InstagramReel>, InstagramError> {
        let account_id = self.account_id.as_deref().ok_or(InstagramError::NotConfigured)?;
        let token = self.access_token().await.ok_or(InstagramError::NotConfigured)?;

        let url = format!("{}/{}/media", self.api_url, account_id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", MEDIA_FIELDS),
                ("access_token", token.as_str()),
                ("limit", limit.to_string().as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        let media: MediaResponse = response.json().await?;

        let total = media.data.len();
        let reels: Vec<InstagramReel> = media.data.into_iter().filter(InstagramReel::is_video).collect();
        info!("Fetched {} reels ({} media items) from Instagram", reels.len(), total);

        Ok(reels)
    }

    /// A single media item by id. `Ok(None)` when the API does not know it.
    pub async fn get_reel(&self, reel_id: &str) -> Result<Option<InstagramReel>, InstagramError> {
        let token = self.access_token().await.ok_or(InstagramError::NotConfigured)?;

        let url = format!("{}/{}", self.api_url, reel_id);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", MEDIA_FIELDS), ("access_token", token.as_str())])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Exchange the current long-lived token for a fresh one and keep it.
    ///
    /// Long-lived tokens expire after 60 days.
    pub async fn refresh_access_token(&self) -> Result<String, InstagramError> {
        let current = self.access_token().await.ok_or(InstagramError::NotConfigured)?;

        let url = format!("{}/refresh_access_token", self.api_url);
        let response = self
            .http
            .get(&url)
            .query(&[("grant_type", "ig_refresh_token"), ("access_token", current.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let refreshed: RefreshResponse = response.json().await?;

        match refreshed.expires_in {
            Some(seconds) => info!("✓ Instagram access token refreshed (expires in {} days)", seconds / 86_400),
            None => info!("✓ Instagram access token refreshed"),
        }

        *self.access_token.write().await = Some(refreshed.access_token.clone());
        Ok(refreshed.access_token)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, InstagramError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    warn!("Instagram API returned {}: {}", status, message);
    Err(InstagramError::Api {
        status: status.as_u16(),
        message,
    })
}
