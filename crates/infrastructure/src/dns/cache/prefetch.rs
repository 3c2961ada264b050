use strata_dns_domain::CacheConfig;
use tokio::time::Instant;

use super::entry::CacheEntry;

/// Decides when a fresh hit should refresh its entry in the background.
#[derive(Debug, Clone, Copy)]
pub struct PrefetchPolicy {
    threshold: f64,
    min_hits: u64,
}

impl PrefetchPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            threshold: config.prefetch_threshold,
            min_hits: config.prefetch_min_hits,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.threshold > 0.0
    }

    /// True once the remaining lifetime drops below `threshold` of the origin
    /// TTL on an entry hit at least `min_hits` times. `hits` includes the
    /// current one.
    pub fn should_prefetch(&self, entry: &CacheEntry, hits: u64, now: Instant) -> bool {
        if !self.is_enabled() || entry.origin_ttl() == 0 || hits < self.min_hits {
            return false;
        }
        let remaining = entry.remaining(now).as_secs_f64();
        remaining / f64::from(entry.origin_ttl()) < self.threshold
    }
}
