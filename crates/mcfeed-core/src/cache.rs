//! Bounded memoization of symbol translations.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::symbol::{translate, VendorSymbol};
use crate::{Exchange, TranslateError};

/// Default number of translations kept before eviction starts.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

#[derive(Debug)]
struct CacheInner {
    // Least recently used first.
    map: IndexMap<String, VendorSymbol>,
    capacity: usize,
}

impl CacheInner {
    fn new(capacity: usize) -> Self {
        Self {
            map: IndexMap::new(),
            capacity,
        }
    }

    fn get(&mut self, key: &str) -> Option<VendorSymbol> {
        let index = self.map.get_index_of(key)?;
        let last = self.map.len() - 1;
        self.map.move_index(index, last);
        self.map.get_index(last).map(|(_, value)| value.clone())
    }

    fn put(&mut self, key: String, value: VendorSymbol) {
        if self.capacity == 0 {
            return;
        }

        if let Some(index) = self.map.get_index_of(&key) {
            self.map.shift_remove_index(index);
        }
        self.map.insert(key, value);

        while self.map.len() > self.capacity {
            self.map.shift_remove_index(0);
        }
    }
}

/// Thread-safe least-recently-used store of vendor codes.
///
/// Entries never expire by age; the least recently read or written entry is
/// dropped once `capacity` is exceeded. A capacity of zero disables storage.
///
/// Recency is the entry order of an `IndexMap`, so a hit or an eviction
/// shifts the entries behind it: O(n) in the cached count per call.
#[derive(Debug)]
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::new(capacity)),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Look up a key and mark it most recently used.
    pub fn get(&self, key: &str) -> Option<VendorSymbol> {
        self.lock().get(key)
    }

    pub fn put(&self, key: impl Into<String>, value: VendorSymbol) {
        self.lock().put(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    pub fn is_disabled(&self) -> bool {
        self.capacity() == 0
    }

    pub fn clear(&self) {
        self.lock().map.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner
            .lock()
            .expect("translation cache lock is not poisoned")
    }
}

/// Translator that consults a shared [`TranslationCache`] first.
///
/// Only successful translations are stored; the key is the exchange-qualified
/// symbol (`rb2410.SHFE`).
#[derive(Debug, Clone, Default)]
pub struct CachedTranslator {
    cache: Arc<TranslationCache>,
}

impl CachedTranslator {
    pub fn new(cache: Arc<TranslationCache>) -> Self {
        Self { cache }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Arc::new(TranslationCache::new(capacity)))
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn translate(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<VendorSymbol, TranslateError> {
        let key = format!("{symbol}.{exchange}");
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let vendor = translate(symbol, exchange)?;
        self.cache.put(key, vendor.clone());
        Ok(vendor)
    }
}
