//! # Document Cache Module
//!
//! Generated documents keyed by root URL, API version and host epoch.
//!
//! ## Single flight
//!
//! Each key owns an `Arc<OnceCell<Arc<Document>>>`. The cell is fetched (or
//! created) under the map's shard lock, then initialised outside it: callers
//! racing on one key block on the same initialisation, and the generator runs
//! once. A failed initialisation removes the empty cell, so errors are never
//! cached and the next caller retries.
//!
//! ## Invalidation
//!
//! The host epoch is part of the key. Swapping the host bumps the epoch, so
//! entries built against the old host can no longer be reached;
//! [`DocumentCache::retain_epoch`] drops them.
//!
//! ## Configuration
//!
//! The cache can be disabled with `ODATA_SWAGGER_CACHE=off` (see
//! [`crate::config`]). A disabled cache runs the generator on every call.

use crate::swagger::Document;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

/// Identifies one generated document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub root_url: String,
    pub api_version: String,
    /// Host generation the document was built against
    pub epoch: u64,
}

impl CacheKey {
    #[must_use]
    pub fn new(root_url: impl Into<String>, api_version: impl Into<String>, epoch: u64) -> Self {
        Self {
            root_url: root_url.into(),
            api_version: api_version.into(),
            epoch,
        }
    }
}

/// Thread-safe single-flight document cache.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: DashMap<CacheKey, Arc<OnceCell<Arc<Document>>>>,
    enabled: bool,
}

impl DocumentCache {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        info!(enabled = enabled, "Initializing document cache");
        Self {
            entries: DashMap::new(),
            enabled,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached document for `key`, generating it with `init` on a miss.
    ///
    /// # Errors
    ///
    /// Whatever `init` returns; nothing is stored in that case.
    pub fn get_or_try_init<E, F>(&self, key: CacheKey, init: F) -> Result<Arc<Document>, E>
    where
        F: FnOnce() -> Result<Document, E>,
    {
        if !self.enabled {
            return init().map(Arc::new);
        }

        let cell = Arc::clone(
            self.entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        if let Some(document) = cell.get() {
            debug!(root_url = %key.root_url, api_version = %key.api_version, epoch = key.epoch, "Document cache hit");
            return Ok(Arc::clone(document));
        }

        let result = cell.get_or_try_init(|| {
            debug!(root_url = %key.root_url, api_version = %key.api_version, epoch = key.epoch, "Document cache miss");
            init().map(Arc::new)
        });
        match result {
            Ok(document) => Ok(Arc::clone(document)),
            Err(e) => {
                self.entries.remove_if(&key, |_, cell| cell.get().is_none());
                Err(e)
            }
        }
    }

    /// Drop entries built against an epoch older than `epoch`.
    pub fn retain_epoch(&self, epoch: u64) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.epoch >= epoch);
        info!(
            epoch,
            entries_removed = before.saturating_sub(self.entries.len()),
            "Document cache invalidated"
        );
    }

    /// Number of keys with a cell, filled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::swagger::Info;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn doc(title: &str) -> Document {
        Document::new(Info::new("v1", title))
    }

    #[test]
    fn hit_returns_the_same_document() {
        let cache = DocumentCache::new(true);
        let key = CacheKey::new("http://localhost/", "v1", 0);
        let a = cache
            .get_or_try_init::<(), _>(key.clone(), || Ok(doc("a")))
            .unwrap();
        let b = cache
            .get_or_try_init::<(), _>(key, || Ok(doc("b")))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.info.title, "a");
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = DocumentCache::new(true);
        let key = CacheKey::new("http://localhost/", "v1", 0);
        let failed: Result<_, &str> = cache.get_or_try_init(key.clone(), || Err("boom"));
        assert!(failed.is_err());
        let ok = cache
            .get_or_try_init::<&str, _>(key, || Ok(doc("retry")))
            .unwrap();
        assert_eq!(ok.info.title, "retry");
    }

    #[test]
    fn failed_generation_leaves_no_entry() {
        let cache = DocumentCache::new(true);
        for root in ["http://a/", "http://b/", "http://c/"] {
            let failed: Result<_, &str> =
                cache.get_or_try_init(CacheKey::new(root, "v1", 0), || Err("boom"));
            assert!(failed.is_err());
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn disabled_cache_always_generates() {
        let cache = DocumentCache::new(false);
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .get_or_try_init::<(), _>(CacheKey::new("r", "v1", 0), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(doc("x"))
                })
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_callers_generate_once() {
        let cache = Arc::new(DocumentCache::new(true));
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_try_init::<(), _>(CacheKey::new("r", "v1", 0), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(doc("once"))
                        })
                        .unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().info.title, "once");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn epochs_separate_entries() {
        let cache = DocumentCache::new(true);
        cache
            .get_or_try_init::<(), _>(CacheKey::new("r", "v1", 0), || Ok(doc("old")))
            .unwrap();
        let fresh = cache
            .get_or_try_init::<(), _>(CacheKey::new("r", "v1", 1), || Ok(doc("new")))
            .unwrap();
        assert_eq!(fresh.info.title, "new");
        cache.retain_epoch(1);
        assert_eq!(cache.len(), 1);
        cache.retain_epoch(2);
        assert!(cache.is_empty());
    }
}
