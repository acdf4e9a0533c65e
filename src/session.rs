//! One visitor's page session.
//!
//! Owns the shared services every component is handed on mount: the video
//! coordinator, the lazy loader with its asset cache, and the page's scroll
//! lock and key listeners. Components never reach for globals.

use std::sync::Arc;

use crate::catalog::CatalogEntry;
use crate::coordinator::VideoCoordinator;
use crate::gallery::VideoCard;
use crate::loader::{AssetFetcher, LazyLoader};
use crate::media::{MediaItem, Variant};
use crate::modal::{VideoModal, VideoSource};
use crate::page::Page;
use crate::toggle::{BilingualToggle, HoverBehavior};

#[derive(Clone)]
pub struct PageSession {
    coordinator: VideoCoordinator,
    loader: LazyLoader,
    page: Page,
}

impl PageSession {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            coordinator: VideoCoordinator::new(),
            loader: LazyLoader::new(fetcher),
            page: Page::new(),
        }
    }

    pub fn coordinator(&self) -> &VideoCoordinator {
        &self.coordinator
    }

    pub fn loader(&self) -> &LazyLoader {
        &self.loader
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn media_item(&self, entry: &CatalogEntry) -> MediaItem {
        MediaItem::from_entry(entry, self.loader.cache())
    }

    /// Mount a bilingual card for a catalog entry.
    pub fn bilingual_card(&self, entry: &CatalogEntry, behavior: HoverBehavior) -> BilingualToggle {
        BilingualToggle::mount(self.media_item(entry), behavior, self.loader.clone())
    }

    /// A closed modal for a video item. Downloads are named `valavaara-<id>.mp4`.
    pub fn video_modal(&self, item: &MediaItem) -> VideoModal {
        let source = VideoSource {
            video: item.variant(Variant::A).clone(),
            title: item.title().map(str::to_string),
            download_name: Some(format!("valavaara-{}.mp4", item.id())),
        };
        self.modal(source)
    }

    pub fn modal(&self, source: VideoSource) -> VideoModal {
        VideoModal::new(
            source,
            self.coordinator.clone(),
            self.page.clone(),
            self.loader.clone(),
        )
    }

    pub fn video_card(&self, entry: &CatalogEntry) -> VideoCard {
        VideoCard::mount(self.media_item(entry), self)
    }
}
