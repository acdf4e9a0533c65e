use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{CatalogEntry, MediaKind};
use crate::i18n::Language;
use crate::loader::{AssetCache, LoadState};

/// One of the two language renditions of a media item.
///
/// `A` is the canonical (English) rendition and is what every card shows
/// first; `B` is the Kannada rendition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    #[default]
    A,
    B,
}

impl Variant {
    pub fn other(self) -> Variant {
        match self {
            Variant::A => Variant::B,
            Variant::B => Variant::A,
        }
    }
}

/// A fetchable asset URL tagged with its language.
///
/// Clones share the load flag, so does every `AssetRef` handed out by the
/// same [`AssetCache`] for the same URL. Only the loader flips the flag.
#[derive(Debug, Clone)]
pub struct AssetRef {
    url: String,
    language: Language,
    state: Arc<LoadState>,
}

impl AssetRef {
    /// A standalone reference with its own load flag, not shared with any cache.
    pub fn new(url: impl Into<String>, language: Language) -> Self {
        Self::with_state(url, language, Arc::new(LoadState::default()))
    }

    pub(crate) fn with_state(url: impl Into<String>, language: Language, state: Arc<LoadState>) -> Self {
        Self {
            url: url.into(),
            language,
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether the payload has been fetched into the session cache.
    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    /// Whether a fetch for this payload is currently running.
    pub fn is_loading(&self) -> bool {
        self.state.is_in_flight()
    }

    pub(crate) fn state(&self) -> &Arc<LoadState> {
        &self.state
    }
}

/// A `<a download>` target: static URL plus the suggested file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub url: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct MediaItem {
    id: String,
    kind: MediaKind,
    title: Option<String>,
    description: Option<String>,
    duration: Option<String>,
    variant_a: AssetRef,
    variant_b: AssetRef,
    thumbnail: Option<AssetRef>,
}

impl MediaItem {
    pub fn new(id: impl Into<String>, kind: MediaKind, variant_a: AssetRef, variant_b: AssetRef) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            description: None,
            duration: None,
            variant_a,
            variant_b,
            thumbnail: None,
        }
    }

    /// Resolve a catalog entry against the session cache.
    pub fn from_entry(entry: &CatalogEntry, cache: &AssetCache) -> Self {
        let mut item = Self::new(
            entry.id,
            entry.kind,
            cache.asset(entry.english, Language::ENGLISH),
            cache.asset(entry.kannada, Language::KANNADA),
        );
        item.title = Some(entry.title.to_string());
        item.description = entry.description.map(str::to_string);
        item.duration = entry.duration.map(str::to_string);
        item.thumbnail = entry.thumbnail.map(|url| cache.asset(url, Language::canonical()));
        item
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    pub fn variant(&self, variant: Variant) -> &AssetRef {
        match variant {
            Variant::A => &self.variant_a,
            Variant::B => &self.variant_b,
        }
    }

    pub fn thumbnail(&self) -> Option<&AssetRef> {
        self.thumbnail.as_ref()
    }

    /// Both variants are the same resource; toggling must not be offered.
    pub fn is_single_source(&self) -> bool {
        self.variant_a.url == self.variant_b.url
    }

    /// Download target for a variant. Never gated on the load flag.
    ///
    /// Single-source items are named `valavaara-<id>.<ext>`, bilingual ones
    /// `valavaara-<kind>-<id>-<eng|knd>.<ext>`.
    pub fn download_link(&self, variant: Variant) -> DownloadLink {
        let asset = self.variant(variant);
        let ext = extension(asset.url());
        let file_name = if self.is_single_source() {
            format!("valavaara-{}.{}", self.id, ext)
        } else {
            format!(
                "valavaara-{}-{}-{}.{}",
                self.kind.slug(),
                self.id,
                asset.language().file_suffix(),
                ext
            )
        };

        DownloadLink {
            url: asset.url().to_string(),
            file_name,
        }
    }
}

fn extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string())
}
