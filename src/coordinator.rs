//! Single-active-video coordinator.
//!
//! At most one video surface per page session may be open. Every
//! video-bearing component registers an [`ActiveVideoHandle`] before it
//! starts playback; registering closes whichever component held the slot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Identity of a mounted video-bearing component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// A process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ComponentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "video#{}", self.0)
    }
}

type CloseFn = Arc<dyn Fn() + Send + Sync>;

/// Tagged registration: who holds the slot and how to make them let go.
#[derive(Clone)]
pub struct ActiveVideoHandle {
    component_id: ComponentId,
    close: CloseFn,
}

impl ActiveVideoHandle {
    pub fn new(component_id: ComponentId, close: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            component_id,
            close: Arc::new(close),
        }
    }

    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }
}

impl fmt::Debug for ActiveVideoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveVideoHandle")
            .field("component_id", &self.component_id)
            .finish_non_exhaustive()
    }
}

/// Session-scoped registry holding at most one active video handle.
///
/// Cloning yields another reference to the same registry. The lock is never
/// held while a close handler runs, so handlers may call back in.
#[derive(Debug, Clone, Default)]
pub struct VideoCoordinator {
    current: Arc<Mutex<Option<ActiveVideoHandle>>>,
}

impl VideoCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `handle` the active video.
    ///
    /// A different holder is closed first, synchronously, and only then is
    /// the new handle registered. Re-registering the current holder is a
    /// no-op. A panicking close handler propagates to the caller.
    pub fn request_activate(&self, handle: ActiveVideoHandle) {
        let previous = {
            let mut current = self.slot();
            match current.as_ref() {
                Some(active) if active.component_id == handle.component_id => return,
                _ => current.take(),
            }
        };

        if let Some(previous) = previous {
            debug!("{} supersedes {}", handle.component_id, previous.component_id);
            (previous.close)();
        }

        debug!("{} is now the active video", handle.component_id);
        *self.slot() = Some(handle);
    }

    /// Clear the registry if `component_id` is the current holder.
    ///
    /// Returns false for stale releases, leaving the newer holder in place.
    pub fn release(&self, component_id: ComponentId) -> bool {
        let mut current = self.slot();
        match current.as_ref() {
            Some(active) if active.component_id == component_id => {
                *current = None;
                debug!("{} released the active video slot", component_id);
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<ComponentId> {
        self.slot().as_ref().map(|handle| handle.component_id)
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveVideoHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
