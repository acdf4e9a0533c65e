//! HTTP proxy in front of the Instagram Graph API.
//!
//! Browsers never see the access token: the reels gallery calls
//! `/api/instagram/reels` and this server forwards to the Graph API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::instagram::{InstagramClient, InstagramError, InstagramReel};

pub const DEFAULT_REELS_LIMIT: u32 = 10;
pub const MAX_REELS_LIMIT: u32 = 100;

/// Body of `/api/instagram/reels`. Failure bodies carry only `success` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reels: Option<Vec<InstagramReel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReelsResponse {
    pub fn ok(reels: Vec<InstagramReel>) -> Self {
        Self {
            success: true,
            count: Some(reels.len()),
            reels: Some(reels),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            reels: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReelResponse {
    success: bool,
    reel: InstagramReel,
}

/// Proxy failure rendered as `{success: false, error}`.
#[derive(Debug)]
pub struct ProxyError {
    status: StatusCode,
    message: &'static str,
}

impl ProxyError {
    fn upstream(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status, Json(ReelsResponse::failure(self.message))).into_response()
    }
}

/// Graph API responses kept for a fixed time, per requested limit.
#[derive(Debug)]
pub struct ReelsCache {
    ttl: Duration,
    entries: Mutex<HashMap<u32, (DateTime<Utc>, Vec<InstagramReel>)>>,
}

impl ReelsCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds.min(u32::MAX as u64) as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, limit: u32, now: DateTime<Utc>) -> Option<Vec<InstagramReel>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&limit)
            .filter(|(stored_at, _)| now - *stored_at < self.ttl)
            .map(|(_, reels)| reels.clone())
    }

    pub fn put(&self, limit: u32, reels: Vec<InstagramReel>, now: DateTime<Utc>) {
        if self.ttl <= Duration::zero() {
            return;
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(limit, (now, reels));
    }
}

pub struct AppState {
    pub instagram: InstagramClient,
    pub cache: ReelsCache,
}

impl AppState {
    pub fn new(instagram: InstagramClient, cache_seconds: u64) -> Self {
        Self {
            instagram,
            cache: ReelsCache::new(cache_seconds),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/instagram/reels", get(list_reels))
        .route("/api/instagram/reels/:id", get(get_reel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ReelsQuery {
    limit: Option<String>,
}

/// Missing or unparsable limits fall back to the default; the rest are
/// clamped to what the Graph API accepts.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .map(|limit| limit.clamp(1, MAX_REELS_LIMIT))
        .unwrap_or(DEFAULT_REELS_LIMIT)
}

async fn health() -> &'static str {
    "OK"
}

async fn list_reels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReelsQuery>,
) -> Result<Json<ReelsResponse>, ProxyError> {
    let limit = parse_limit(query.limit.as_deref());
    let now = Utc::now();

    if let Some(reels) = state.cache.get(limit, now) {
        debug!("Serving {} cached reels (limit={})", reels.len(), limit);
        return Ok(Json(ReelsResponse::ok(reels)));
    }

    match state.instagram.fetch_reels(limit).await {
        Ok(reels) => {
            state.cache.put(limit, reels.clone(), now);
            Ok(Json(ReelsResponse::ok(reels)))
        }
        // Without credentials the gallery just shows its fallback
        Err(InstagramError::NotConfigured) => {
            error!("Instagram credentials not configured");
            Ok(Json(ReelsResponse::ok(Vec::new())))
        }
        Err(e) => {
            error!("Error in Instagram reels route: {}", e);
            Err(ProxyError::upstream("Failed to fetch reels"))
        }
    }
}

async fn get_reel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReelResponse>, ProxyError> {
    match state.instagram.get_reel(&id).await {
        Ok(Some(reel)) => Ok(Json(ReelResponse { success: true, reel })),
        Ok(None) => Err(ProxyError::not_found("Reel not found")),
        Err(e) => {
            error!("Error fetching Instagram reel {}: {}", id, e);
            Err(ProxyError::upstream("Failed to fetch reel"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reel(id: &str) -> InstagramReel {
        serde_json::from_value(json!({
            "id": id,
            "media_type": "REELS",
            "media_url": format!("https://cdn.example.com/{}.mp4", id),
            "permalink": format!("https://www.instagram.com/reel/{}/", id)
        }))
        .unwrap()
    }

    // ==================== parse_limit Tests ====================

    #[test]
    fn test_parse_limit_default() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("")), 10);
        assert_eq!(parse_limit(Some("ten")), 10);
        assert_eq!(parse_limit(Some("-3")), 10);
    }

    #[test]
    fn test_parse_limit_clamps() {
        assert_eq!(parse_limit(Some("5")), 5);
        assert_eq!(parse_limit(Some("0")), 1);
        assert_eq!(parse_limit(Some("5000")), MAX_REELS_LIMIT);
        assert_eq!(parse_limit(Some(" 7 ")), 7);
    }

    // ==================== ReelsResponse Tests ====================

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(ReelsResponse::ok(vec![reel("a")])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["reels"][0]["id"], "a");
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_failure_body_shape() {
        let body = serde_json::to_value(ReelsResponse::failure("Failed to fetch reels")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Failed to fetch reels"}));
    }

    #[test]
    fn test_proxy_error_status() {
        let response = ProxyError::upstream("Failed to fetch reels").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ==================== ReelsCache Tests ====================

    #[test]
    fn test_cache_hit_within_ttl() {
        let cache = ReelsCache::new(3600);
        let now = Utc::now();
        cache.put(5, vec![reel("a")], now);

        let hit = cache.get(5, now + Duration::minutes(59)).unwrap();
        assert_eq!(hit.len(), 1);
        assert!(cache.get(10, now).is_none(), "Different limit is a different entry");
    }

    #[test]
    fn test_cache_expires() {
        let cache = ReelsCache::new(3600);
        let now = Utc::now();
        cache.put(5, vec![reel("a")], now);

        assert!(cache.get(5, now + Duration::hours(1)).is_none());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ReelsCache::new(0);
        let now = Utc::now();
        cache.put(5, vec![reel("a")], now);
        assert!(cache.get(5, now).is_none());
    }
}
