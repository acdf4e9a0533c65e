//! Bilingual toggle engine.
//!
//! Each bilingual gallery card owns one [`BilingualToggle`]. It tracks which
//! language rendition the visitor asked for and, through the loader, makes
//! sure that rendition is fetched before it is put on screen.

use tracing::debug;

use crate::loader::{LazyLoader, PreloadTask};
use crate::media::{DownloadLink, MediaItem, Variant};

/// How a card reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverBehavior {
    /// Hover only warms the alternate rendition; a click switches (hoardings).
    Preload,
    /// The alternate rendition is shown while hovered (posters, celebrity launches).
    Swap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub active_variant: Variant,
    pub hovered: bool,
}

pub struct BilingualToggle {
    item: MediaItem,
    behavior: HoverBehavior,
    state: ToggleState,
    loader: LazyLoader,
    pending: Vec<PreloadTask>,
}

impl BilingualToggle {
    /// Mount a card. The primary rendition is requested right away.
    pub fn mount(item: MediaItem, behavior: HoverBehavior, loader: LazyLoader) -> Self {
        let mut toggle = Self {
            item,
            behavior,
            state: ToggleState::default(),
            loader,
            pending: Vec::new(),
        };
        toggle.preload(Variant::A);
        toggle
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// False for single-source items; the UI must hide the toggle affordance.
    pub fn toggle_available(&self) -> bool {
        !self.item.is_single_source()
    }

    /// Flip the active rendition and start fetching it if needed.
    ///
    /// Every call flips again; callers debounce if they need to.
    pub fn toggle(&mut self) {
        if !self.toggle_available() {
            return;
        }
        self.state.active_variant = self.state.active_variant.other();
        debug!("Card {} toggled to {:?}", self.item.id(), self.state.active_variant);
        self.preload(self.state.active_variant);
    }

    /// Record pointer enter/leave. Entering warms the inactive rendition.
    pub fn set_hover(&mut self, hovering: bool) {
        let entering = hovering && !self.state.hovered;
        self.state.hovered = hovering;

        if entering && self.toggle_available() {
            self.preload(self.state.active_variant.other());
        }
    }

    /// The rendition the visitor is asking to see.
    pub fn requested_variant(&self) -> Variant {
        match self.behavior {
            HoverBehavior::Swap if self.state.hovered && self.toggle_available() => {
                self.state.active_variant.other()
            }
            _ => self.state.active_variant,
        }
    }

    /// The rendition actually on screen. A secondary rendition is only swapped
    /// in once its bytes are loaded; until then the primary stays visible.
    pub fn rendered_variant(&self) -> Variant {
        let requested = self.requested_variant();
        if requested == Variant::A || self.item.variant(requested).is_loaded() {
            requested
        } else {
            Variant::A
        }
    }

    pub fn rendered_url(&self) -> &str {
        self.item.variant(self.rendered_variant()).url()
    }

    /// Language indicator badge for what is on screen ("ENG" / "ಕನ್ನಡ").
    pub fn badge(&self) -> &'static str {
        self.item.variant(self.rendered_variant()).language().badge()
    }

    /// Download links are static and available before the variant loads.
    pub fn download_link(&self, variant: Variant) -> DownloadLink {
        self.item.download_link(variant)
    }

    /// Unmount: abandon in-flight preloads and reset to the default state.
    pub fn unmount(&mut self) {
        for task in self.pending.drain(..) {
            task.cancel();
        }
        self.state = ToggleState::default();
    }

    fn preload(&mut self, variant: Variant) {
        self.pending.retain(|task| !task.is_finished());
        if let Some(task) = self.loader.ensure_loaded(self.item.variant(variant)) {
            self.pending.push(task);
        }
    }
}

impl Drop for BilingualToggle {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetCatalog, MediaKind};
    use crate::i18n::Language;
    use crate::loader::testing::GatedFetcher;
    use crate::media::AssetRef;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn poster_toggle(fetcher: Arc<GatedFetcher>, behavior: HoverBehavior) -> BilingualToggle {
        let loader = LazyLoader::new(fetcher);
        let entry = AssetCatalog::get().find("1").unwrap();
        let item = MediaItem::from_entry(entry, loader.cache());
        BilingualToggle::mount(item, behavior, loader)
    }

    fn single_source_toggle(fetcher: Arc<GatedFetcher>) -> BilingualToggle {
        let loader = LazyLoader::new(fetcher);
        let item = MediaItem::new(
            "still-1",
            MediaKind::PressStill,
            AssetRef::new("/assets/still.png", Language::ENGLISH),
            AssetRef::new("/assets/still.png", Language::KANNADA),
        );
        BilingualToggle::mount(item, HoverBehavior::Preload, loader)
    }

    async fn settle(toggle: &mut BilingualToggle) {
        for task in toggle.pending.drain(..) {
            task.finished().await;
        }
    }

    // ==================== Mount Tests ====================

    #[tokio::test]
    async fn test_mount_defaults_to_primary_and_loads_it() {
        let fetcher = GatedFetcher::open();
        let mut toggle = poster_toggle(fetcher.clone(), HoverBehavior::Swap);

        assert_eq!(toggle.state(), ToggleState::default());
        assert_eq!(toggle.rendered_variant(), Variant::A);
        assert_eq!(toggle.badge(), "ENG");

        settle(&mut toggle).await;
        assert!(toggle.item().variant(Variant::A).is_loaded());
        assert!(!toggle.item().variant(Variant::B).is_loaded());
        assert_eq!(fetcher.calls(), 1);
    }

    // ==================== toggle Tests ====================

    #[tokio::test]
    async fn test_toggle_flips_and_twice_restores() {
        let mut toggle = poster_toggle(GatedFetcher::open(), HoverBehavior::Preload);

        toggle.toggle();
        assert_eq!(toggle.state().active_variant, Variant::B);
        toggle.toggle();
        assert_eq!(toggle.state().active_variant, Variant::A);
    }

    #[tokio::test]
    async fn test_toggle_loads_new_variant_before_rendering_it() {
        let fetcher = GatedFetcher::closed();
        let mut toggle = poster_toggle(fetcher.clone(), HoverBehavior::Preload);

        toggle.toggle();
        assert_eq!(toggle.requested_variant(), Variant::B);
        // Kannada bytes not here yet, English stays on screen
        assert_eq!(toggle.rendered_variant(), Variant::A);

        fetcher.release(2);
        settle(&mut toggle).await;
        assert_eq!(toggle.rendered_variant(), Variant::B);
        assert_eq!(toggle.badge(), "ಕನ್ನಡ");
        assert_eq!(toggle.rendered_url(), "/assets/posters/knd/poster1.jpg");
    }

    #[tokio::test]
    async fn test_toggle_is_noop_for_single_source() {
        let fetcher = GatedFetcher::open();
        let mut toggle = single_source_toggle(fetcher.clone());

        assert!(!toggle.toggle_available());
        toggle.toggle();
        assert_eq!(toggle.state(), ToggleState::default());

        toggle.set_hover(true);
        settle(&mut toggle).await;
        // Only the mount fetch, hovering a single-source item fetches nothing new
        assert_eq!(fetcher.calls(), 1);
    }

    // ==================== set_hover Tests ====================

    #[tokio::test]
    async fn test_hover_enter_preloads_other_variant_once() {
        let fetcher = GatedFetcher::closed();
        let mut toggle = poster_toggle(fetcher.clone(), HoverBehavior::Preload);
        assert_eq!(fetcher.calls(), 1);

        toggle.set_hover(true);
        assert_eq!(fetcher.calls(), 2);
        assert!(toggle.item().variant(Variant::B).is_loading());

        // Repeated enter without leave is not a transition
        toggle.set_hover(true);
        assert_eq!(fetcher.calls(), 2);

        // Leave and re-enter while still in flight does not refetch
        toggle.set_hover(false);
        toggle.set_hover(true);
        assert_eq!(fetcher.calls(), 2);

        fetcher.release(2);
        settle(&mut toggle).await;
        toggle.set_hover(false);
        toggle.set_hover(true);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_hover_failure_retries_on_next_hover() {
        let fetcher = GatedFetcher::open();
        let mut toggle = poster_toggle(fetcher.clone(), HoverBehavior::Swap);
        settle(&mut toggle).await;

        fetcher.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        toggle.set_hover(true);
        settle(&mut toggle).await;
        assert!(!toggle.item().variant(Variant::B).is_loaded());
        assert_eq!(toggle.rendered_variant(), Variant::A);
        assert!(toggle.toggle_available());

        fetcher.fail.store(false, std::sync::atomic::Ordering::SeqCst);
        toggle.set_hover(false);
        toggle.set_hover(true);
        settle(&mut toggle).await;
        assert!(toggle.item().variant(Variant::B).is_loaded());
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_swap_behavior_shows_other_while_hovered() {
        let fetcher = GatedFetcher::open();
        let mut toggle = poster_toggle(fetcher, HoverBehavior::Swap);

        toggle.set_hover(true);
        settle(&mut toggle).await;
        assert_eq!(toggle.rendered_variant(), Variant::B);
        assert_eq!(toggle.state().active_variant, Variant::A);

        toggle.set_hover(false);
        assert_eq!(toggle.rendered_variant(), Variant::A);
    }

    // ==================== Download Tests ====================

    #[tokio::test]
    async fn test_download_link_not_gated_by_load() {
        let fetcher = GatedFetcher::closed();
        let mut toggle = poster_toggle(fetcher, HoverBehavior::Swap);
        toggle.set_hover(true);

        assert!(!toggle.item().variant(Variant::B).is_loaded());
        let link = toggle.download_link(Variant::B);
        assert_eq!(link.url, "/assets/posters/knd/poster1.jpg");
        assert_eq!(link.file_name, "valavaara-poster-1-knd.jpg");
    }

    // ==================== Unmount Tests ====================

    #[tokio::test]
    async fn test_unmount_resets_and_cancels() {
        let fetcher = GatedFetcher::closed();
        let mut toggle = poster_toggle(fetcher, HoverBehavior::Preload);
        toggle.toggle();
        toggle.set_hover(true);

        toggle.unmount();
        assert_eq!(toggle.state(), ToggleState::default());
        assert!(toggle.pending.is_empty());
        assert!(!toggle.item().variant(Variant::B).is_loaded());
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_toggle_parity(flips in 0usize..40, hovers in proptest::collection::vec(any::<bool>(), 0..10)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let mut toggle = poster_toggle(GatedFetcher::open(), HoverBehavior::Preload);
                for hovering in &hovers {
                    toggle.set_hover(*hovering);
                }
                for _ in 0..flips {
                    let before = toggle.state().active_variant;
                    toggle.toggle();
                    prop_assert_ne!(before, toggle.state().active_variant);
                }
                let expected = if flips % 2 == 0 { Variant::A } else { Variant::B };
                prop_assert_eq!(toggle.state().active_variant, expected);
                Ok(())
            })?;
        }

        #[test]
        fn prop_single_source_never_changes(flips in 0usize..20) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let mut toggle = single_source_toggle(GatedFetcher::open());
                for _ in 0..flips {
                    toggle.toggle();
                }
                prop_assert_eq!(toggle.state(), ToggleState::default());
                Ok(())
            })?;
        }
    }
}
