use std::sync::Arc;
use std::time::Duration;
use strata_dns_infrastructure::dns::InMemoryCacheMetrics;
use tracing::info;

/// Logs a per-zone cache snapshot every `interval_secs` seconds.
pub fn spawn_metrics_reporter(metrics: Arc<InMemoryCacheMetrics>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.tick().await;

        loop {
            interval.tick().await;
            for zone in metrics.snapshot().zones {
                info!(
                    zone = %zone.zone,
                    success_size = zone.success.size,
                    denial_size = zone.denial.size,
                    hits = zone.hits(),
                    misses = zone.misses(),
                    hit_rate = %format!("{:.3}", zone.hit_rate()),
                    stale_hits = zone.success.stale_hits + zone.denial.stale_hits,
                    evictions = zone.success.evictions + zone.denial.evictions,
                    prefetches = zone.prefetches,
                    prefetch_failures = zone.prefetch_failures,
                    uncacheable = zone.uncacheable,
                    "Cache metrics"
                );
            }
        }
    });
}
