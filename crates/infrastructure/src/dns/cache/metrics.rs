use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use strata_dns_application::ports::{
    CacheMetricsSink, CacheMetricsSnapshot, TierCounters, ZoneCacheSnapshot,
};
use strata_dns_domain::CacheTier;

#[derive(Default)]
struct TierAtomics {
    size: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    stale_hits: AtomicU64,
    expirations: AtomicU64,
}

impl TierAtomics {
    fn snapshot(&self) -> TierCounters {
        TierCounters {
            size: self.size.load(AtomicOrdering::Relaxed),
            hits: self.hits.load(AtomicOrdering::Relaxed),
            misses: self.misses.load(AtomicOrdering::Relaxed),
            evictions: self.evictions.load(AtomicOrdering::Relaxed),
            stale_hits: self.stale_hits.load(AtomicOrdering::Relaxed),
            expirations: self.expirations.load(AtomicOrdering::Relaxed),
        }
    }
}

#[derive(Default)]
struct ZoneCounters {
    success: TierAtomics,
    denial: TierAtomics,
    prefetches: AtomicU64,
    prefetch_failures: AtomicU64,
    uncacheable: AtomicU64,
}

impl ZoneCounters {
    fn tier(&self, tier: CacheTier) -> &TierAtomics {
        match tier {
            CacheTier::Success => &self.success,
            CacheTier::Denial => &self.denial,
        }
    }
}

/// Process-local [`CacheMetricsSink`] keeping one set of atomics per zone.
///
/// An exporter reads it through [`snapshot`](Self::snapshot).
#[derive(Default)]
pub struct InMemoryCacheMetrics {
    zones: DashMap<String, ZoneCounters, FxBuildHasher>,
}

impl InMemoryCacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_zone<R>(&self, zone: &str, f: impl FnOnce(&ZoneCounters) -> R) -> R {
        if let Some(counters) = self.zones.get(zone) {
            return f(counters.value());
        }
        let counters = self.zones.entry(zone.to_string()).or_default();
        f(counters.value())
    }

    fn bump(&self, zone: &str, tier: CacheTier, pick: impl FnOnce(&TierAtomics) -> &AtomicU64) {
        self.with_zone(zone, |c| {
            pick(c.tier(tier)).fetch_add(1, AtomicOrdering::Relaxed);
        });
    }

    /// Point-in-time copy of every counter, zones sorted by name.
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        let mut zones: Vec<ZoneCacheSnapshot> = self
            .zones
            .iter()
            .map(|entry| {
                let c = entry.value();
                ZoneCacheSnapshot {
                    zone: entry.key().clone(),
                    success: c.success.snapshot(),
                    denial: c.denial.snapshot(),
                    prefetches: c.prefetches.load(AtomicOrdering::Relaxed),
                    prefetch_failures: c.prefetch_failures.load(AtomicOrdering::Relaxed),
                    uncacheable: c.uncacheable.load(AtomicOrdering::Relaxed),
                }
            })
            .collect();
        zones.sort_by(|a, b| a.zone.cmp(&b.zone));
        CacheMetricsSnapshot { zones }
    }
}

impl CacheMetricsSink for InMemoryCacheMetrics {
    fn set_size(&self, zone: &str, tier: CacheTier, size: usize) {
        self.with_zone(zone, |c| {
            c.tier(tier).size.store(size as u64, AtomicOrdering::Relaxed);
        });
    }

    fn record_hit(&self, zone: &str, tier: CacheTier) {
        self.bump(zone, tier, |t| &t.hits);
    }

    fn record_miss(&self, zone: &str, tier: CacheTier) {
        self.bump(zone, tier, |t| &t.misses);
    }

    fn record_uncacheable(&self, zone: &str) {
        self.with_zone(zone, |c| {
            c.uncacheable.fetch_add(1, AtomicOrdering::Relaxed);
        });
    }

    fn record_prefetch(&self, zone: &str) {
        self.with_zone(zone, |c| {
            c.prefetches.fetch_add(1, AtomicOrdering::Relaxed);
        });
    }

    fn record_prefetch_failure(&self, zone: &str) {
        self.with_zone(zone, |c| {
            c.prefetch_failures.fetch_add(1, AtomicOrdering::Relaxed);
        });
    }

    fn record_eviction(&self, zone: &str, tier: CacheTier) {
        self.bump(zone, tier, |t| &t.evictions);
    }

    fn record_stale_hit(&self, zone: &str, tier: CacheTier) {
        self.bump(zone, tier, |t| &t.stale_hits);
    }

    fn record_expiration(&self, zone: &str, tier: CacheTier) {
        self.bump(zone, tier, |t| &t.expirations);
    }
}
