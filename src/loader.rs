//! Lazy media loading.
//!
//! Assets are fetched only when a card is about to show them: the alternate
//! language rendition on first hover or toggle, video payloads on the first
//! play request. Fetches run as background tasks and report completion only
//! through the asset's shared load flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::i18n::Language;
use crate::media::AssetRef;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{0}")]
    Other(String),
}

/// Fetches the bytes behind an asset URL into the client cache.
pub trait AssetFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<(), LoadError>>;
}

/// Load flag shared by every `AssetRef` for one URL.
#[derive(Debug, Default)]
pub(crate) struct LoadState {
    loaded: AtomicBool,
    in_flight: AtomicBool,
}

impl LoadState {
    pub(crate) fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::Release);
    }

    /// Claim the right to start a fetch.
    ///
    /// `None` if one is already running, or if the payload landed after the
    /// caller last checked. A finishing fetch sets `loaded` before it drops
    /// its claim, so the check after claiming cannot miss it.
    fn begin(state: &Arc<LoadState>) -> Option<InFlightGuard> {
        state
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        let guard = InFlightGuard(Arc::clone(state));
        if state.is_loaded() {
            return None;
        }
        Some(guard)
    }
}

/// Clears the in-flight marker however the fetch ends, including abort.
struct InFlightGuard(Arc<LoadState>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

/// Per-session table of load flags, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    states: Arc<Mutex<HashMap<String, Arc<LoadState>>>>,
}

impl AssetCache {
    /// Reference to `url`, sharing its load flag with every other reference
    /// this cache handed out for the same URL.
    pub fn asset(&self, url: &str, language: Language) -> AssetRef {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states.entry(url.to_string()).or_default();
        AssetRef::with_state(url, language, Arc::clone(state))
    }

    pub fn loaded_count(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|state| state.is_loaded())
            .count()
    }
}

/// Handle to a background preload. Dropping it leaves the fetch running;
/// call [`PreloadTask::cancel`] to abandon it.
#[derive(Debug)]
pub struct PreloadTask {
    url: String,
    handle: JoinHandle<()>,
}

impl PreloadTask {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        if !self.handle.is_finished() {
            debug!("Cancelling preload of {}", self.url);
        }
        self.handle.abort();
    }

    /// Wait for the fetch to settle, successfully or not.
    pub async fn finished(self) {
        let _ = self.handle.await;
    }
}

#[derive(Clone)]
pub struct LazyLoader {
    fetcher: Arc<dyn AssetFetcher>,
    cache: AssetCache,
}

impl LazyLoader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            fetcher,
            cache: AssetCache::default(),
        }
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Start fetching `asset` unless it is loaded or already being fetched.
    ///
    /// Returns the task when a fetch was spawned. Failures are swallowed: the
    /// flag stays unset and the next call starts a fresh attempt.
    ///
    /// Must be called from within a tokio runtime.
    pub fn ensure_loaded(&self, asset: &AssetRef) -> Option<PreloadTask> {
        if asset.is_loaded() {
            return None;
        }

        let state = Arc::clone(asset.state());
        let guard = match LoadState::begin(&state) {
            Some(guard) => guard,
            None => {
                debug!("Preload of {} already in flight or done", asset.url());
                return None;
            }
        };

        let url = asset.url().to_string();
        let fetch = self.fetcher.fetch(&url);

        debug!("Preloading {}", url);
        let task_url = url.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            match fetch.await {
                Ok(()) => {
                    state.mark_loaded();
                    debug!("Preloaded {}", task_url);
                }
                Err(e) => {
                    debug!("Preload of {} failed, will retry on next interaction: {}", task_url, e);
                }
            }
        });

        Some(PreloadTask { url, handle })
    }
}

/// Fetches assets over HTTP. Site-relative paths resolve against `base_url`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LoadError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<(), LoadError>> {
        let client = self.client.clone();
        let url = self.resolve(url);

        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|source| LoadError::Request {
                    url: url.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            // Drain the body so the payload is actually in the cache
            response
                .bytes()
                .await
                .map_err(|source| LoadError::Request { url, source })?;

            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    /// Counts fetches and holds each one until a permit is released.
    pub(crate) struct GatedFetcher {
        pub calls: AtomicUsize,
        pub fail: AtomicBool,
        gate: Arc<Semaphore>,
    }

    impl GatedFetcher {
        /// Fetches complete immediately.
        pub fn open() -> Arc<Self> {
            let fetcher = Self::closed();
            fetcher.gate.add_permits(Semaphore::MAX_PERMITS / 2);
            fetcher
        }

        /// Fetches block until `release` is called.
        pub fn closed() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                gate: Arc::new(Semaphore::new(0)),
            })
        }

        pub fn release(&self, n: usize) {
            self.gate.add_permits(n);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AssetFetcher for GatedFetcher {
        fn fetch(&self, url: &str) -> BoxFuture<'static, Result<(), LoadError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&self.gate);
            let fail = self.fail.load(Ordering::SeqCst);
            let url = url.to_string();

            Box::pin(async move {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|_| LoadError::Other("gate closed".to_string()))?;
                permit.forget();
                if fail {
                    Err(LoadError::Other(format!("simulated failure for {}", url)))
                } else {
                    Ok(())
                }
            })
        }
    }
}
