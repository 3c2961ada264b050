mod cache_metrics;
mod dns_handler;

pub use cache_metrics::{
    CacheMetricsSink, CacheMetricsSnapshot, NoopCacheMetrics, TierCounters, ZoneCacheSnapshot,
};
pub use dns_handler::{DnsHandler, Next, RequestContext};
