use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strata_dns_domain::CacheTier;

use super::entry::CacheEntry;
use super::key::CacheKey;

type TierMap = LruCache<CacheKey, Arc<CacheEntry>, FxBuildHasher>;

/// What a [`TieredStore::put`] did to the target tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted,
    /// The key was already present; its entry was overwritten and promoted.
    Replaced,
    /// The tier was full; its least recently used key was dropped.
    Evicted(CacheKey),
    /// The tier has capacity 0.
    Disabled,
}

/// One capacity-bounded LRU map behind a single lock, so eviction always
/// picks the least recently used key of the whole tier.
struct LruTier {
    map: Option<Mutex<TierMap>>,
    capacity: usize,
}

impl LruTier {
    fn new(capacity: usize) -> Self {
        let map = NonZeroUsize::new(capacity)
            .map(|cap| Mutex::new(LruCache::with_hasher(cap, FxBuildHasher)));
        Self { map, capacity }
    }

    fn lock(&self) -> Option<MutexGuard<'_, TierMap>> {
        self.map
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.lock()?.get(key).cloned()
    }

    fn peek(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.lock()?.peek(key).cloned()
    }

    fn put(&self, key: CacheKey, entry: Arc<CacheEntry>) -> PutOutcome {
        let Some(mut map) = self.lock() else {
            return PutOutcome::Disabled;
        };
        match map.push(key, entry) {
            None => PutOutcome::Inserted,
            Some((old, _)) if old == key => PutOutcome::Replaced,
            Some((evicted, _)) => PutOutcome::Evicted(evicted),
        }
    }

    fn remove(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.lock()?.pop(key)
    }

    fn remove_if_same(&self, key: &CacheKey, entry: &Arc<CacheEntry>) -> bool {
        let Some(mut map) = self.lock() else {
            return false;
        };
        let same = map
            .peek(key)
            .map(|current| Arc::ptr_eq(current, entry))
            .unwrap_or(false);
        if same {
            map.pop(key);
        }
        same
    }

    fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn clear(&self) {
        if let Some(mut map) = self.lock() {
            map.clear();
        }
    }
}

/// The `success` and `denial` tiers. A key lives in at most one of them.
pub struct TieredStore {
    success: LruTier,
    denial: LruTier,
}

impl TieredStore {
    pub fn new(success_capacity: usize, denial_capacity: usize) -> Self {
        Self {
            success: LruTier::new(success_capacity),
            denial: LruTier::new(denial_capacity),
        }
    }

    fn tier(&self, tier: CacheTier) -> &LruTier {
        match tier {
            CacheTier::Success => &self.success,
            CacheTier::Denial => &self.denial,
        }
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&self, tier: CacheTier, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.tier(tier).get(key)
    }

    /// Looks up `key` without touching its recency.
    pub fn peek(&self, tier: CacheTier, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.tier(tier).peek(key)
    }

    pub fn put(&self, tier: CacheTier, key: CacheKey, entry: Arc<CacheEntry>) -> PutOutcome {
        self.tier(tier.other()).remove(&key);
        self.tier(tier).put(key, entry)
    }

    pub fn remove(&self, tier: CacheTier, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.tier(tier).remove(key)
    }

    /// Removes `key` only while it still maps to `entry`, so a concurrent
    /// refresh is never thrown away. Returns whether it removed anything.
    pub fn remove_if_same(&self, tier: CacheTier, key: &CacheKey, entry: &Arc<CacheEntry>) -> bool {
        self.tier(tier).remove_if_same(key, entry)
    }

    pub fn len(&self, tier: CacheTier) -> usize {
        self.tier(tier).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len(CacheTier::Success) == 0 && self.len(CacheTier::Denial) == 0
    }

    pub fn capacity(&self, tier: CacheTier) -> usize {
        self.tier(tier).capacity
    }

    pub fn clear(&self) {
        self.success.clear();
        self.denial.clear();
    }
}
