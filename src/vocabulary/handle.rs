//! Shared, lazily built vocabulary.
//!
//! ```text
//!   get() ──► current? ──yes──► Arc<VocabularyStore>   (lock-free)
//!                │
//!                no
//!                ▼
//!          build_lock ──► current? ──► cache / source ──► store ──► current
//! ```
//!
//! Readers never block each other. Concurrent first calls are serialized
//! by `build_lock`, so the source is fetched once per invalidation.

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;

use super::{
    AllowList, FileCache, FileSource, MemoryCache, SnapshotCache, VocabularySource,
    VocabularyStore,
};
use crate::config::SchemaConfig;
use crate::error::Result;
use crate::log;

/// Process-wide handle to the current vocabulary store.
pub struct VocabularyHandle {
    source: Box<dyn VocabularySource>,
    allow: AllowList,
    cache: Arc<dyn SnapshotCache>,
    tolerate_unavailable: bool,
    current: ArcSwapOption<VocabularyStore>,
    build_lock: Mutex<()>,
}

impl VocabularyHandle {
    pub fn new(
        source: Box<dyn VocabularySource>,
        allow: AllowList,
        cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        Self {
            source,
            allow,
            cache,
            tolerate_unavailable: false,
            current: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        }
    }

    /// Serve an empty store instead of failing when the source is unavailable.
    ///
    /// The empty store is not retained: the next [`get`](Self::get) retries.
    pub fn tolerate_unavailable(mut self, tolerate: bool) -> Self {
        self.tolerate_unavailable = tolerate;
        self
    }

    /// Handle backed by the configured source file and cache directory.
    pub fn from_config(config: &SchemaConfig) -> Self {
        let cache: Arc<dyn SnapshotCache> = match config.cache_dir() {
            Some(dir) => Arc::new(FileCache::new(dir)),
            None => Arc::new(MemoryCache::new()),
        };
        Self::new(
            Box::new(FileSource::new(config.source_path())),
            config.allow_list(),
            cache,
        )
        .tolerate_unavailable(config.vocabulary.tolerate_unavailable)
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Current store, building it on first use.
    pub fn get(&self) -> Result<Arc<VocabularyStore>> {
        if let Some(store) = self.current.load_full() {
            return Ok(store);
        }

        let _guard = self.build_lock.lock();
        if let Some(store) = self.current.load_full() {
            return Ok(store);
        }

        match VocabularyStore::load_cached(self.source.as_ref(), &self.allow, self.cache.as_ref()) {
            Ok(store) => {
                let store = Arc::new(store);
                self.current.store(Some(Arc::clone(&store)));
                Ok(store)
            }
            Err(err) if self.tolerate_unavailable => {
                log!("error"; "{err}; serving an empty vocabulary");
                Ok(Arc::new(VocabularyStore::empty(&self.allow)?))
            }
            Err(err) => Err(err),
        }
    }

    /// Drop the current store and its cached snapshot.
    pub fn invalidate(&self) -> Result<()> {
        let _guard = self.build_lock.lock();
        self.current.store(None);
        self.cache.invalidate(&self.allow.fingerprint())
    }

    /// Rebuild from the source, bypassing any cached snapshot.
    pub fn reload(&self) -> Result<Arc<VocabularyStore>> {
        self.invalidate()?;
        self.get()
    }
}
