//! Page-level resources shared by overlays: the body scroll lock and global
//! keyboard listeners.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Char(char),
}

type Listener = Arc<dyn Fn(Key) + Send + Sync>;

#[derive(Default)]
struct PageInner {
    scroll_locks: AtomicUsize,
    next_listener: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

/// Cloning yields another reference to the same page.
#[derive(Clone, Default)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent body scrolling until the returned guard is dropped.
    /// Locks nest; scrolling resumes when the last guard goes.
    pub fn lock_scroll(&self) -> ScrollLock {
        self.inner.scroll_locks.fetch_add(1, Ordering::AcqRel);
        ScrollLock {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.inner.scroll_locks.load(Ordering::Acquire) > 0
    }

    /// Register a document-level key listener, removed when the guard drops.
    pub fn add_key_listener(&self, listener: impl Fn(Key) + Send + Sync + 'static) -> KeyListener {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners().push((id, Arc::new(listener)));
        KeyListener {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn key_listener_count(&self) -> usize {
        self.listeners().len()
    }

    /// Deliver a key press to every listener registered at the time of the press.
    pub fn dispatch_key(&self, key: Key) {
        let snapshot: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(key);
        }
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener)>> {
        self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[must_use = "the scroll lock is released when this guard is dropped"]
pub struct ScrollLock {
    inner: Arc<PageInner>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.inner.scroll_locks.fetch_sub(1, Ordering::AcqRel);
    }
}

#[must_use = "the listener is removed when this guard is dropped"]
pub struct KeyListener {
    id: u64,
    inner: Arc<PageInner>,
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != self.id);
    }
}
