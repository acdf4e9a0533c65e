//! Video modal: the full-screen playback surface.
//!
//! State machine:
//!
//! ```text
//! Closed --open--> Opening --media_ready--> Playing <--toggle_play--> Paused
//!    ^                |                        |                        |
//!    +------close-----+------------close-------+----------close---------+
//! ```
//!
//! Opening registers with the [`VideoCoordinator`] first, so any other open
//! modal is closed before this one can produce sound. While open the modal
//! holds the page scroll lock and a document-level Escape listener; both are
//! released on close, whatever triggered it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info};

use crate::coordinator::{ActiveVideoHandle, ComponentId, VideoCoordinator};
use crate::loader::{LazyLoader, PreloadTask};
use crate::media::{AssetRef, DownloadLink};
use crate::page::{Key, KeyListener, Page, ScrollLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Closed,
    Opening,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_open(&self) -> bool {
        !matches!(self, PlaybackState::Closed)
    }
}

/// What to play and how to label it.
#[derive(Debug, Clone)]
pub struct VideoSource {
    pub video: AssetRef,
    pub title: Option<String>,
    pub download_name: Option<String>,
}

struct ModalInner {
    state: PlaybackState,
    muted: bool,
    scroll_lock: Option<ScrollLock>,
    escape: Option<KeyListener>,
    payload: Option<PreloadTask>,
}

struct ModalShared {
    id: ComponentId,
    source: VideoSource,
    coordinator: VideoCoordinator,
    page: Page,
    loader: LazyLoader,
    inner: Mutex<ModalInner>,
}

impl ModalShared {
    fn lock(&self) -> MutexGuard<'_, ModalInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) -> bool {
        let (scroll_lock, escape, payload) = {
            let mut inner = self.lock();
            if inner.state == PlaybackState::Closed {
                return false;
            }
            inner.state = PlaybackState::Closed;
            inner.muted = true;
            (inner.scroll_lock.take(), inner.escape.take(), inner.payload.take())
        };

        drop(scroll_lock);
        drop(escape);
        if let Some(task) = payload {
            task.cancel();
        }
        self.coordinator.release(self.id);

        debug!("{} closed", self.id);
        true
    }
}

pub struct VideoModal {
    shared: Arc<ModalShared>,
}

impl VideoModal {
    pub fn new(source: VideoSource, coordinator: VideoCoordinator, page: Page, loader: LazyLoader) -> Self {
        Self {
            shared: Arc::new(ModalShared {
                id: ComponentId::next(),
                source,
                coordinator,
                page,
                loader,
                inner: Mutex::new(ModalInner {
                    state: PlaybackState::Closed,
                    muted: true,
                    scroll_lock: None,
                    escape: None,
                    payload: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.shared.id
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.lock().state
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    pub fn is_muted(&self) -> bool {
        self.shared.lock().muted
    }

    pub fn title(&self) -> Option<&str> {
        self.shared.source.title.as_deref()
    }

    pub fn video(&self) -> &AssetRef {
        &self.shared.source.video
    }

    /// Closed → Opening. Any other active video is closed first.
    ///
    /// Returns false if the modal was already open.
    pub fn open(&self) -> bool {
        if self.is_open() {
            return false;
        }

        let shared = &self.shared;
        shared.coordinator.request_activate(self.handle());

        let weak = Arc::downgrade(shared);
        let escape = shared.page.add_key_listener(move |key| {
            if key == Key::Escape {
                if let Some(modal) = weak.upgrade() {
                    modal.close();
                }
            }
        });
        let scroll_lock = shared.page.lock_scroll();
        // The video payload is only requested now that playback was asked for
        let payload = shared.loader.ensure_loaded(&shared.source.video);

        let mut inner = shared.lock();
        inner.state = PlaybackState::Opening;
        // The modal plays with sound, unlike the muted grid preview
        inner.muted = false;
        inner.scroll_lock = Some(scroll_lock);
        inner.escape = Some(escape);
        inner.payload = payload;

        info!("{} opened {}", shared.id, shared.source.video.url());
        true
    }

    /// The media element can play. Opening → Playing; ignored otherwise,
    /// which makes a readiness event arriving after close harmless.
    pub fn media_ready(&self) -> PlaybackState {
        let mut inner = self.shared.lock();
        if inner.state == PlaybackState::Opening {
            inner.state = PlaybackState::Playing;
        }
        inner.state
    }

    /// Playing ⇄ Paused. No effect in other states.
    pub fn toggle_play(&self) -> PlaybackState {
        let mut inner = self.shared.lock();
        inner.state = match inner.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
            other => other,
        };
        inner.state
    }

    pub fn toggle_mute(&self) -> bool {
        let mut inner = self.shared.lock();
        inner.muted = !inner.muted;
        inner.muted
    }

    /// Close button, backdrop click or Escape. Returns false if already closed.
    pub fn close(&self) -> bool {
        self.shared.close()
    }

    pub fn download(&self) -> Option<DownloadLink> {
        self.shared
            .source
            .download_name
            .as_ref()
            .map(|file_name| DownloadLink {
                url: self.shared.source.video.url().to_string(),
                file_name: file_name.clone(),
            })
    }

    fn handle(&self) -> ActiveVideoHandle {
        let weak: Weak<ModalShared> = Arc::downgrade(&self.shared);
        ActiveVideoHandle::new(self.shared.id, move || {
            if let Some(modal) = weak.upgrade() {
                modal.close();
            }
        })
    }
}

impl Drop for VideoModal {
    fn drop(&mut self) {
        self.shared.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::loader::testing::GatedFetcher;
    use std::sync::Arc;

    struct Fixture {
        coordinator: VideoCoordinator,
        page: Page,
        loader: LazyLoader,
        fetcher: Arc<GatedFetcher>,
    }

    impl Fixture {
        fn new() -> Self {
            let fetcher = GatedFetcher::closed();
            Self {
                coordinator: VideoCoordinator::new(),
                page: Page::new(),
                loader: LazyLoader::new(fetcher.clone()),
                fetcher,
            }
        }

        fn modal(&self, url: &str) -> VideoModal {
            let source = VideoSource {
                video: self.loader.cache().asset(url, Language::ENGLISH),
                title: Some("Valavaara Reel".to_string()),
                download_name: Some("valavaara-reel.mp4".to_string()),
            };
            VideoModal::new(source, self.coordinator.clone(), self.page.clone(), self.loader.clone())
        }
    }

    // ==================== Transition Tests ====================

    #[tokio::test]
    async fn test_open_enters_opening_unmuted() {
        let fx = Fixture::new();
        let modal = fx.modal("/assets/videos/shorts/short1.mp4");
        assert_eq!(modal.state(), PlaybackState::Closed);

        assert!(modal.open());
        assert_eq!(modal.state(), PlaybackState::Opening);
        assert!(!modal.is_muted());
        assert_eq!(fx.coordinator.active(), Some(modal.id()));
        assert!(fx.page.is_scroll_locked());
        assert_eq!(fx.page.key_listener_count(), 1);
        assert!(!modal.open(), "Second open is a no-op");
    }

    #[tokio::test]
    async fn test_video_payload_requested_only_on_open() {
        let fx = Fixture::new();
        let modal = fx.modal("/assets/videos/bts/bts-01.mp4");
        assert_eq!(fx.fetcher.calls(), 0);

        modal.open();
        assert_eq!(fx.fetcher.calls(), 1);
        assert!(modal.video().is_loading());
    }

    #[tokio::test]
    async fn test_media_ready_plays_and_toggle_pauses() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();

        assert_eq!(modal.media_ready(), PlaybackState::Playing);
        assert_eq!(modal.toggle_play(), PlaybackState::Paused);
        assert!(!modal.toggle_mute());
        assert_eq!(modal.state(), PlaybackState::Paused, "Mute is independent of play state");
        assert_eq!(modal.toggle_play(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_toggle_play_ignored_while_closed_or_opening() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");

        assert_eq!(modal.toggle_play(), PlaybackState::Closed);
        modal.open();
        assert_eq!(modal.toggle_play(), PlaybackState::Opening);
    }

    #[tokio::test]
    async fn test_close_releases_everything() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();
        modal.media_ready();

        assert!(modal.close());
        assert_eq!(modal.state(), PlaybackState::Closed);
        assert!(modal.is_muted());
        assert!(!fx.page.is_scroll_locked());
        assert_eq!(fx.page.key_listener_count(), 0);
        assert_eq!(fx.coordinator.active(), None);
        assert!(!modal.close());
    }

    #[tokio::test]
    async fn test_late_media_ready_after_close_is_noop() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();
        modal.close();

        assert_eq!(modal.media_ready(), PlaybackState::Closed);
    }

    #[tokio::test]
    async fn test_close_cancels_pending_payload() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();
        modal.close();

        for _ in 0..100 {
            if !modal.video().is_loading() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!modal.video().is_loading());
        assert!(!modal.video().is_loaded());
    }

    // ==================== Escape Tests ====================

    #[tokio::test]
    async fn test_escape_closes_open_modal() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();

        fx.page.dispatch_key(Key::Char('k'));
        assert!(modal.is_open());

        fx.page.dispatch_key(Key::Escape);
        assert_eq!(modal.state(), PlaybackState::Closed);
        assert_eq!(fx.page.key_listener_count(), 0);
    }

    #[tokio::test]
    async fn test_no_listener_while_closed() {
        let fx = Fixture::new();
        let _modal = fx.modal("/v.mp4");
        assert_eq!(fx.page.key_listener_count(), 0);
    }

    // ==================== Exclusivity Tests ====================

    #[tokio::test]
    async fn test_opening_second_modal_closes_first() {
        let fx = Fixture::new();
        let first = fx.modal("/one.mp4");
        let second = fx.modal("/two.mp4");

        first.open();
        first.media_ready();
        second.open();

        assert_eq!(first.state(), PlaybackState::Closed);
        assert_eq!(second.state(), PlaybackState::Opening);
        assert_eq!(fx.coordinator.active(), Some(second.id()));
        // Only the second modal still holds page resources
        assert!(fx.page.is_scroll_locked());
        assert_eq!(fx.page.key_listener_count(), 1);
    }

    #[tokio::test]
    async fn test_dropping_open_modal_releases_slot() {
        let fx = Fixture::new();
        let modal = fx.modal("/v.mp4");
        modal.open();

        drop(modal);
        assert_eq!(fx.coordinator.active(), None);
        assert!(!fx.page.is_scroll_locked());
    }

    #[tokio::test]
    async fn test_download_link() {
        let fx = Fixture::new();
        let modal = fx.modal("/assets/videos/shorts/short1.mp4");

        let link = modal.download().unwrap();
        assert_eq!(link.url, "/assets/videos/shorts/short1.mp4");
        assert_eq!(link.file_name, "valavaara-reel.mp4");
    }
}
