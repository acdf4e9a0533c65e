//! Gallery components built on the toggle engine, the loader and the modal.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{AssetCatalog, CatalogEntry, MediaKind, DEFAULT_POSTER_COUNT};
use crate::i18n::Language;
use crate::instagram::InstagramReel;
use crate::loader::{AssetCache, PreloadTask};
use crate::media::{AssetRef, DownloadLink, MediaItem};
use crate::modal::VideoModal;
use crate::server::ReelsResponse;
use crate::session::PageSession;
use crate::toggle::{BilingualToggle, HoverBehavior};

pub const DEFAULT_REEL_TITLE: &str = "Valavaara Reel";
pub const DEFAULT_REEL_DESCRIPTION: &str = "From our Instagram";

/// A grid of bilingual cards sharing one hover behavior.
pub struct BilingualGallery {
    cards: Vec<BilingualToggle>,
}

impl BilingualGallery {
    pub fn mount(session: &PageSession, entries: &[&CatalogEntry], behavior: HoverBehavior) -> Self {
        let cards = entries
            .iter()
            .map(|entry| session.bilingual_card(entry, behavior))
            .collect();
        Self { cards }
    }

    /// The first six posters, or all of them.
    pub fn posters(session: &PageSession, show_all: bool) -> Self {
        let posters = AssetCatalog::get().posters(show_all, DEFAULT_POSTER_COUNT);
        Self::mount(session, &posters, HoverBehavior::Swap)
    }

    pub fn celebrity_launches(session: &PageSession) -> Self {
        let entries = AssetCatalog::get().by_kind(MediaKind::CelebrityLaunch);
        Self::mount(session, &entries, HoverBehavior::Swap)
    }

    pub fn hoardings(session: &PageSession) -> Self {
        let entries = AssetCatalog::get().by_kind(MediaKind::Hoarding);
        Self::mount(session, &entries, HoverBehavior::Preload)
    }

    pub fn cards(&self) -> &[BilingualToggle] {
        &self.cards
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut BilingualToggle> {
        self.cards.iter_mut().find(|card| card.item().id() == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Grid card for a short or BTS clip: a muted looping preview in the grid,
/// full playback in its modal.
pub struct VideoCard {
    item: MediaItem,
    modal: VideoModal,
    preview_muted: bool,
    thumbnail: Option<PreloadTask>,
}

impl VideoCard {
    /// Mount the card. The thumbnail is fetched now, the video only on open.
    pub fn mount(item: MediaItem, session: &PageSession) -> Self {
        let thumbnail = item
            .thumbnail()
            .and_then(|thumb| session.loader().ensure_loaded(thumb));
        let modal = session.video_modal(&item);

        Self {
            item,
            modal,
            preview_muted: true,
            thumbnail,
        }
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }

    pub fn modal(&self) -> &VideoModal {
        &self.modal
    }

    /// The inline preview pauses while this card's modal is open.
    pub fn preview_playing(&self) -> bool {
        !self.modal.is_open()
    }

    pub fn is_preview_muted(&self) -> bool {
        self.preview_muted
    }

    /// Preview sound, independent of the modal's own mute state.
    pub fn toggle_preview_mute(&mut self) -> bool {
        self.preview_muted = !self.preview_muted;
        self.preview_muted
    }

    pub fn open(&self) -> bool {
        self.modal.open()
    }

    pub fn close(&self) -> bool {
        self.modal.close()
    }

    pub fn download_link(&self) -> Option<DownloadLink> {
        self.modal.download()
    }
}

impl Drop for VideoCard {
    fn drop(&mut self) {
        if let Some(task) = self.thumbnail.take() {
            task.cancel();
        }
    }
}

pub struct VideoGallery {
    cards: Vec<VideoCard>,
}

impl VideoGallery {
    pub fn mount(session: &PageSession, entries: &[&CatalogEntry]) -> Self {
        let cards = entries.iter().map(|entry| session.video_card(entry)).collect();
        Self { cards }
    }

    pub fn shorts(session: &PageSession) -> Self {
        Self::mount(session, &AssetCatalog::get().by_kind(MediaKind::Short))
    }

    pub fn bts_clips(session: &PageSession) -> Self {
        Self::mount(session, &AssetCatalog::get().by_kind(MediaKind::BtsClip))
    }

    pub fn cards(&self) -> &[VideoCard] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&VideoCard> {
        self.cards.iter().find(|card| card.item().id() == id)
    }

    /// The card whose modal is currently open, if any.
    pub fn playing(&self) -> Option<&VideoCard> {
        self.cards.iter().find(|card| card.modal().is_open())
    }
}

/// Inline reel tile: muted autoplay with a sound toggle and a download link.
#[derive(Debug, Clone)]
pub struct ReelCard {
    id: String,
    title: String,
    description: String,
    video: AssetRef,
    thumbnail: Option<AssetRef>,
    permalink: Option<String>,
    muted: bool,
}

impl ReelCard {
    /// Card text comes from the caption: first line is the title, second the
    /// description. Blank or missing lines use the defaults.
    pub fn from_reel(reel: &InstagramReel, cache: &AssetCache) -> Self {
        let mut lines = reel.caption.as_deref().unwrap_or_default().split('\n');
        let title = caption_line(lines.next()).unwrap_or(DEFAULT_REEL_TITLE);
        let description = caption_line(lines.next()).unwrap_or(DEFAULT_REEL_DESCRIPTION);

        Self {
            id: reel.id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            video: cache.asset(&reel.media_url, Language::canonical()),
            thumbnail: reel
                .thumbnail_url
                .as_deref()
                .map(|url| cache.asset(url, Language::canonical())),
            permalink: Some(reel.permalink.clone()).filter(|p| !p.is_empty()),
            muted: true,
        }
    }

    /// A locally hosted fallback video.
    pub fn from_entry(entry: &CatalogEntry, cache: &AssetCache) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: entry.description.unwrap_or(DEFAULT_REEL_DESCRIPTION).to_string(),
            video: cache.asset(entry.english, Language::canonical()),
            thumbnail: entry.thumbnail.map(|url| cache.asset(url, Language::canonical())),
            permalink: None,
            muted: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn video(&self) -> &AssetRef {
        &self.video
    }

    pub fn thumbnail(&self) -> Option<&AssetRef> {
        self.thumbnail.as_ref()
    }

    pub fn permalink(&self) -> Option<&str> {
        self.permalink.as_deref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn download_link(&self) -> DownloadLink {
        DownloadLink {
            url: self.video.url().to_string(),
            file_name: format!("valavaara-{}.mp4", self.id),
        }
    }
}

fn caption_line(line: Option<&str>) -> Option<&str> {
    line.map(str::trim).filter(|l| !l.is_empty())
}

#[derive(Debug, Error)]
pub enum ReelsApiError {
    #[error("Failed to reach reels endpoint: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Reels endpoint returned status {0}")]
    Status(u16),
}

/// Client side of `/api/instagram/reels`.
#[derive(Debug, Clone)]
pub struct ReelsApiClient {
    http: reqwest::Client,
    site_url: String,
}

impl ReelsApiClient {
    pub fn new(site_url: impl Into<String>) -> Result<Self, ReelsApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Failure bodies (`success: false`) are returned as `Ok`; only an
    /// unreadable response is an error.
    pub async fn fetch(&self, limit: u32) -> Result<ReelsResponse, ReelsApiError> {
        let url = format!("{}/api/instagram/reels", self.site_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        match response.json::<ReelsResponse>().await {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ReelsApiError::Status(status.as_u16())),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelsSource {
    Loading,
    Instagram,
    Fallback,
}

/// Reels section: Instagram reels when the proxy has some, the local
/// fallback videos otherwise. Never an empty grid once resolved.
pub struct ReelsGallery {
    limit: u32,
    source: ReelsSource,
    cards: Vec<ReelCard>,
}

impl ReelsGallery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            source: ReelsSource::Loading,
            cards: Vec::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn source(&self) -> ReelsSource {
        self.source
    }

    pub fn cards(&self) -> &[ReelCard] {
        &self.cards
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut ReelCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    pub async fn load(&mut self, api: &ReelsApiClient, session: &PageSession) {
        let result = api.fetch(self.limit).await;
        self.resolve(result, session);
    }

    /// Settle the gallery from a proxy result.
    pub fn resolve(&mut self, result: Result<ReelsResponse, ReelsApiError>, session: &PageSession) {
        let cache = session.loader().cache();

        let reels = match result {
            Ok(ReelsResponse {
                success: true,
                reels: Some(reels),
                ..
            }) if !reels.is_empty() => reels,
            Ok(ReelsResponse { error, .. }) => {
                warn!(
                    "Reels proxy returned no reels ({}), showing fallback videos",
                    error.as_deref().unwrap_or("empty")
                );
                return self.fall_back(cache);
            }
            Err(e) => {
                warn!("Failed to fetch Instagram reels: {}", e);
                return self.fall_back(cache);
            }
        };

        info!("Showing {} Instagram reels", reels.len());
        self.source = ReelsSource::Instagram;
        self.cards = reels
            .iter()
            .map(|reel| ReelCard::from_reel(reel, cache))
            .collect();
    }

    fn fall_back(&mut self, cache: &AssetCache) {
        self.source = ReelsSource::Fallback;
        self.cards = AssetCatalog::get()
            .fallback_reels()
            .into_iter()
            .map(|entry| ReelCard::from_entry(entry, cache))
            .collect();
        debug!("Fallback reels: {}", self.cards.len());
    }
}
