//! Static asset catalog.
//!
//! Every logical media item on the site, keyed by id, with its English and
//! Kannada asset paths. Items that only exist in one language reuse the same
//! path for both variants, which disables toggling for them.
//!
//! Entries are plain `'static` descriptors. Load state lives in the session
//! asset cache, see [`crate::loader::AssetCache`].

use std::sync::OnceLock;

/// External ticket-booking link used by every call-to-action.
pub const BOOKING_URL: &str = "https://in.bookmyshow.com/movies/bengaluru/valavaara/ET00463120";

/// Number of posters the home page gallery shows.
pub const DEFAULT_POSTER_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Poster,
    CelebrityLaunch,
    Hoarding,
    Short,
    BtsClip,
    BtsPhoto,
    Song,
    PressPoster,
    PressStill,
    PressClipping,
    Promotion,
    Logo,
}

impl MediaKind {
    /// Word used in download file names (`valavaara-<slug>-<id>-eng.jpg`).
    pub fn slug(&self) -> &'static str {
        match self {
            MediaKind::Poster => "poster",
            MediaKind::CelebrityLaunch => "celebrity",
            MediaKind::Hoarding => "hoarding",
            MediaKind::Short => "short",
            MediaKind::BtsClip => "bts",
            MediaKind::BtsPhoto => "bts-photo",
            MediaKind::Song => "song",
            MediaKind::PressPoster => "press-poster",
            MediaKind::PressStill => "still",
            MediaKind::PressClipping => "press",
            MediaKind::Promotion => "promotion",
            MediaKind::Logo => "logo",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Short | MediaKind::BtsClip | MediaKind::Song)
    }
}

/// A catalog entry. `english` and `kannada` are the two variant paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub kind: MediaKind,
    pub title: &'static str,
    pub description: Option<&'static str>,
    pub duration: Option<&'static str>,
    pub english: &'static str,
    pub kannada: &'static str,
    pub thumbnail: Option<&'static str>,
}

impl CatalogEntry {
    const fn bilingual(
        id: &'static str,
        kind: MediaKind,
        title: &'static str,
        english: &'static str,
        kannada: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description: None,
            duration: None,
            english,
            kannada,
            thumbnail: None,
        }
    }

    const fn single(id: &'static str, kind: MediaKind, title: &'static str, url: &'static str) -> Self {
        Self::bilingual(id, kind, title, url, url)
    }

    const fn video(
        id: &'static str,
        kind: MediaKind,
        title: &'static str,
        description: &'static str,
        url: &'static str,
        thumbnail: &'static str,
        duration: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description: Some(description),
            duration: Some(duration),
            english: url,
            kannada: url,
            thumbnail: Some(thumbnail),
        }
    }

    /// Shorts have no separate poster frame; the grid shows no thumbnail
    /// until the clip itself is requested.
    const fn short(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        url: &'static str,
        duration: &'static str,
    ) -> Self {
        Self {
            id,
            kind: MediaKind::Short,
            title,
            description: Some(description),
            duration: Some(duration),
            english: url,
            kannada: url,
            thumbnail: None,
        }
    }

    /// Both variants point at the same resource.
    pub fn is_single_source(&self) -> bool {
        self.english == self.kannada
    }
}

pub struct AssetCatalog {
    entries: Vec<CatalogEntry>,
}

static CATALOG: OnceLock<AssetCatalog> = OnceLock::new();

impl AssetCatalog {
    pub fn get() -> &'static AssetCatalog {
        CATALOG.get_or_init(|| AssetCatalog {
            entries: default_entries(),
        })
    }

    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries of one kind, in display order.
    pub fn by_kind(&self, kind: MediaKind) -> Vec<&CatalogEntry> {
        self.entries.iter().filter(|entry| entry.kind == kind).collect()
    }

    /// Poster gallery contents: all posters, or the first `max` of them.
    pub fn posters(&self, show_all: bool, max: usize) -> Vec<&CatalogEntry> {
        let posters = self.by_kind(MediaKind::Poster);
        if show_all {
            posters
        } else {
            posters.into_iter().take(max).collect()
        }
    }

    /// Shorts are addressed by slug on the watch pages; the slug is the id.
    pub fn short_by_slug(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == MediaKind::Short && entry.id == slug)
    }

    /// Locally hosted videos shown when the reels proxy is unavailable.
    pub fn fallback_reels(&self) -> Vec<&CatalogEntry> {
        FALLBACK_REEL_IDS
            .iter()
            .filter_map(|id| self.short_by_slug(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const FALLBACK_REEL_IDS: &[&str] = &[
    "valavaara-reel-serious",
    "valavaara-short-2",
    "valavaara-short-3",
];

fn default_entries() -> Vec<CatalogEntry> {
    use MediaKind::*;

    let mut entries = Vec::new();

    // Posters: ids follow the file numbering, poster 5 was withdrawn
    for (id, eng, knd) in [
        ("1", "/assets/posters/eng/poster1.jpg", "/assets/posters/knd/poster1.jpg"),
        ("2", "/assets/posters/eng/poster2.jpg", "/assets/posters/knd/poster2.jpg"),
        ("3", "/assets/posters/eng/poster3.jpg", "/assets/posters/knd/poster3.jpg"),
        ("4", "/assets/posters/eng/poster4.jpg", "/assets/posters/knd/poster4.jpg"),
        ("6", "/assets/posters/eng/poster6.jpg", "/assets/posters/knd/poster6.jpg"),
        ("7", "/assets/posters/eng/poster7.jpg", "/assets/posters/knd/poster7.jpg"),
        ("8", "/assets/posters/eng/poster8.jpg", "/assets/posters/knd/poster8.jpg"),
    ] {
        entries.push(CatalogEntry::bilingual(id, Poster, "Valavaara Poster", eng, knd));
    }

    entries.extend([
        CatalogEntry::bilingual(
            "dr-shivarajkumar",
            CelebrityLaunch,
            "Dr. Shivarajkumar",
            "/assets/celebrity/DrShivarajkumarEng.jpeg",
            "/assets/celebrity/DrShivarajkumarKnd.jpeg",
        ),
        CatalogEntry::bilingual(
            "nivedita",
            CelebrityLaunch,
            "Nivedita",
            "/assets/celebrity/nivedettaENG.jpg",
            "/assets/celebrity/nivedettaKND.jpg",
        ),
        CatalogEntry::bilingual(
            "daali",
            CelebrityLaunch,
            "Daali",
            "/assets/celebrity/DaaliEng.jpg",
            "/assets/celebrity/DaaliKnd.jpg",
        ),
        CatalogEntry::bilingual(
            "design1",
            Hoarding,
            "Hoarding (Design 1)",
            "/assets/posters/eng/poster7.jpg",
            "/assets/posters/knd/poster7.jpg",
        ),
        CatalogEntry::bilingual(
            "design2",
            Hoarding,
            "Hoarding (Design 2)",
            "/assets/posters/eng/poster1.jpg",
            "/assets/posters/knd/poster1.jpg",
        ),
    ]);

    for (id, title, description, url, duration) in [
        ("valavaara-reel-serious", "Valavaara Reel", "Experience the emotional journey of Valavaara 🐄", "/assets/videos/shorts/short1.mp4", "0:45"),
        ("valavaara-short-2", "Valavaara Moments", "Beautiful moments from Valavaara 💕", "/assets/videos/shorts/short2.mp4", "0:38"),
        ("valavaara-short-3", "Valavaara Adventure", "An exciting glimpse into the world of Valavaara 🌾", "/assets/videos/shorts/short3.mp4", "0:52"),
        ("valavaara-billboards", "Valavaara Billboards", "See Valavaara taking over the city! 🎬", "/assets/videos/shorts/short4.mp4", "0:30"),
        ("valavaara-happy", "Happy Moments", "Joyful moments from Valavaara 😊🐄", "/assets/videos/shorts/short6.mp4", "0:40"),
        ("valavaara-anthem", "Valavaara Anthem", "Feel the spirit of Valavaara! 🎵🐄", "/assets/videos/shorts/short7.mp4", "0:50"),
        ("gowra-missing-eng", "Gowra Is Missing (English)", "Where is Gowra? Watch now! 🔍", "/assets/videos/shorts/short8-eng.mp4", "0:45"),
        ("gowra-missing-knd", "Gowra Is Missing (Kannada)", "ಗೌರ ಎಲ್ಲಿದ್ದಾರೆ? 🔍", "/assets/videos/shorts/short8-knd.mp4", "0:45"),
        ("trailer-promo", "Trailer Promo", "Step into the world of emotions, laughter and love 💖", "/assets/videos/shorts/trailer-promo.mp4", "0:55"),
        ("valavaara-reels", "Valavaara Reels", "Amazing moments from Valavaara 🎬", "/assets/videos/shorts/reels.mp4", "0:50"),
        ("valavaara-shorts", "Valavaara Shorts", "More exciting clips from Valavaara 🎞️", "/assets/videos/shorts/shorts.mp4", "0:48"),
        ("valavaara-kids-review", "Valavaara Review", "Loved by kids! Approved by teachers! A film the whole family will enjoy! 🎞️", "/assets/videos/shorts/reviewshorts4.mp4", "0:48"),
        ("valavaara-kids-review-1", "Valavaara Review", "When the youngest audience gives the biggest thumbs up 👍✨", "/assets/videos/shorts/reviewshorts3.mp4", "0:48"),
        ("valavaara-reviews", "Valavaara Reviews", "Energy 10/10, Rating 5/5, Love 100%. Valavaara is loved by all 💯❤️", "/assets/videos/shorts/reviewshorts1.mp4", "0:48"),
        ("valavaara-reviews-1", "Valavaara Reviews", "Whether you're 8 or 38 or 68 - this movie is for you.✨🎞️", "/assets/videos/shorts/reviewshorts2.mp4", "0:48"),
        ("valavaara-review-2", "Valavaara Kids Reviews", "Certified by the toughest critics - Kids 🎥", "/assets/videos/shorts/reviewshorts5.mp4", "0:48"),
        ("kundesi-in-shivamogga", "Kundesi in Shivamogga", "❤️ Housefull premiere in Shivamogga! 🐄🎬", "/assets/videos/shorts/Kundesi_in_shivamogga.mp4", "0:48"),
        ("valavaara-review-shivamogga", "Valavaara Review", "Shivamogga audience reviews Valavaara! 🐄❤️.", "/assets/videos/shorts/Shivamogga_review_1.mp4", "0:48"),
        ("valavaara-review-shivamogga-2", "Valavaara Reviews", "Valavaara finding its way to hearts, Shivamogga housefull premiere! ✨🎞️", "/assets/videos/shorts/Shivamogga_review_2.mp4", "0:48"),
    ] {
        entries.push(CatalogEntry::short(id, title, description, url, duration));
    }

    entries.extend([
        CatalogEntry::video(
            "bts-making",
            BtsClip,
            "Making of Valavaara",
            "Behind the scenes",
            "/assets/videos/bts/bts-01.mp4",
            "/assets/videos/bts/bts-01-thumb.jpg",
            "3:45",
        ),
        CatalogEntry::video(
            "bts-cast",
            BtsClip,
            "Meet the Cast",
            "Behind the scenes",
            "/assets/videos/bts/bts-02.mp4",
            "/assets/videos/bts/bts-02-thumb.jpg",
            "4:20",
        ),
        CatalogEntry::video(
            "bts-cow",
            BtsClip,
            "Training Vallu",
            "Behind the scenes",
            "/assets/videos/bts/bts-03.mp4",
            "/assets/videos/bts/bts-03-thumb.jpg",
            "2:55",
        ),
        CatalogEntry::video(
            "song-title",
            Song,
            "Valavaara Title Song",
            "Title track",
            "/assets/videos/songs/song-01.mp4",
            "/assets/videos/songs/song-01-thumb.jpg",
            "4:12",
        ),
        CatalogEntry::video(
            "song-friendship",
            Song,
            "Friendship Anthem",
            "Friendship anthem",
            "/assets/videos/songs/song-02.mp4",
            "/assets/videos/songs/song-02-thumb.jpg",
            "3:45",
        ),
    ]);

    for (id, url) in [
        ("bts-img-1", "/assets/images/bts/5L5A2962.JPG"),
        ("bts-img-2", "/assets/images/bts/5L5A4635.JPG"),
        ("bts-img-3", "/assets/images/bts/5L5A4751.JPG"),
        ("bts-img-4", "/assets/images/bts/5L5A4856.JPG"),
        ("bts-img-5", "/assets/images/bts/5L5A5857.JPG"),
        ("bts-img-6", "/assets/images/bts/5L5A7292.JPG"),
        ("bts-img-7", "/assets/images/bts/5L5A8148.JPG"),
        ("bts-img-8", "/assets/images/bts/5L5A8620.JPG"),
        ("bts-img-9", "/assets/images/bts/5L5A9079.JPG"),
    ] {
        entries.push(CatalogEntry::single(id, BtsPhoto, "Behind the Scenes", url));
    }

    entries.extend([
        CatalogEntry::single("poster-1080x1920", PressPoster, "Poster - Story (1080x1920)", "/assets/posters/poster-1080x1920.jpg"),
        CatalogEntry::single("poster-1200x628", PressPoster, "Poster - OG Image (1200x628)", "/assets/posters/poster-1200x628.jpg"),
        CatalogEntry::single("poster-1080x1080", PressPoster, "Poster - Square (1080x1080)", "/assets/posters/poster-1080x1080.jpg"),
    ]);

    for (id, url) in [
        ("still-1", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_1.png"),
        ("still-2", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_2.png"),
        ("still-3", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_3.png"),
        ("still-4", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_4.png"),
        ("still-5", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_5.png"),
        ("still-6", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_6.png"),
        ("still-7", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_7.png"),
        ("still-8", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_8.png"),
        ("still-9", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_9.png"),
        ("still-10", "https://morph-production.s3.ap-south-1.amazonaws.com/Image_10.png"),
    ] {
        entries.push(CatalogEntry::single(id, PressStill, "Still", url));
    }

    entries.extend([
        CatalogEntry::single("press-1", PressClipping, "Press Coverage 1", "/assets/press/newspaper.jpg"),
        CatalogEntry::single("press-2", PressClipping, "Press Coverage 2", "/assets/press/newspaper2.jpg"),
        CatalogEntry::single("press-3", PressClipping, "Press Coverage 3", "/assets/press/newspaper3.jpg"),
        CatalogEntry::single("press-4", PressClipping, "Press Coverage 4", "/assets/press/newspaper4.jpg"),
        CatalogEntry::single("news-article", PressClipping, "News Article", "/assets/press/news.webp"),
        CatalogEntry::single("promotion-banner", Promotion, "Promotion Banner", "/assets/promotions/promotion.jpeg"),
        CatalogEntry::single("pamphlet", Promotion, "Pamphlet", "/assets/promotions/pamphlet.jpeg"),
        CatalogEntry::single("poster-promotion", Promotion, "Poster Promotion", "/assets/promotions/posterPromotion.jpeg"),
        CatalogEntry::bilingual("logo-dark", Logo, "Logo (Dark)", "/assets/logos/engDark.png", "/assets/logos/KndDark.png"),
        CatalogEntry::bilingual("logo-light", Logo, "Logo (Light)", "/assets/logos/EngLight.png", "/assets/logos/KndLight.png"),
    ]);

    entries
}
