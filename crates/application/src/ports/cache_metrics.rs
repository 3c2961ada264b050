use serde::Serialize;
use strata_dns_domain::CacheTier;

/// Telemetry capability injected into every cache link.
///
/// Implementations must be cheap: every method sits on the query path.
pub trait CacheMetricsSink: Send + Sync {
    fn set_size(&self, zone: &str, tier: CacheTier, size: usize);
    fn record_hit(&self, zone: &str, tier: CacheTier);
    /// A miss whose fetched response was classified into `tier`.
    fn record_miss(&self, zone: &str, tier: CacheTier);
    /// A miss whose fetched response could not be cached.
    fn record_uncacheable(&self, zone: &str);
    fn record_prefetch(&self, zone: &str);
    fn record_prefetch_failure(&self, zone: &str);
    fn record_eviction(&self, zone: &str, tier: CacheTier);
    fn record_stale_hit(&self, zone: &str, tier: CacheTier);
    fn record_expiration(&self, zone: &str, tier: CacheTier);
}

pub struct NoopCacheMetrics;

impl CacheMetricsSink for NoopCacheMetrics {
    fn set_size(&self, _zone: &str, _tier: CacheTier, _size: usize) {}
    fn record_hit(&self, _zone: &str, _tier: CacheTier) {}
    fn record_miss(&self, _zone: &str, _tier: CacheTier) {}
    fn record_uncacheable(&self, _zone: &str) {}
    fn record_prefetch(&self, _zone: &str) {}
    fn record_prefetch_failure(&self, _zone: &str) {}
    fn record_eviction(&self, _zone: &str, _tier: CacheTier) {}
    fn record_stale_hit(&self, _zone: &str, _tier: CacheTier) {}
    fn record_expiration(&self, _zone: &str, _tier: CacheTier) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounters {
    pub size: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub stale_hits: u64,
    pub expirations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCacheSnapshot {
    pub zone: String,
    pub success: TierCounters,
    pub denial: TierCounters,
    pub prefetches: u64,
    pub prefetch_failures: u64,
    pub uncacheable: u64,
}

impl ZoneCacheSnapshot {
    pub fn tier(&self, tier: CacheTier) -> &TierCounters {
        match tier {
            CacheTier::Success => &self.success,
            CacheTier::Denial => &self.denial,
        }
    }

    pub fn hits(&self) -> u64 {
        self.success.hits + self.denial.hits
    }

    pub fn misses(&self) -> u64 {
        self.success.misses + self.denial.misses + self.uncacheable
    }

    /// Percentage of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetricsSnapshot {
    pub zones: Vec<ZoneCacheSnapshot>,
}

impl CacheMetricsSnapshot {
    pub fn zone(&self, zone: &str) -> Option<&ZoneCacheSnapshot> {
        self.zones.iter().find(|z| z.zone == zone)
    }
}
