use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use strata_dns_application::ports::{CacheMetricsSink, DnsHandler, Next, RequestContext};
use strata_dns_application::{DnsRequest, DnsResponse};
use strata_dns_domain::{is_in_zone, normalize_fqdn, CacheConfig, CacheTier, DomainError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::entry::CacheEntry;
use super::key::CacheKey;
use super::policy::{CacheDecision, TtlPolicy};
use super::prefetch::PrefetchPolicy;
use super::single_flight::SingleFlight;
use super::storage::{PutOutcome, TieredStore};

/// Shared between the handler and the fetch tasks it spawns.
struct CacheCore {
    store: TieredStore,
    policy: TtlPolicy,
    prefetch: PrefetchPolicy,
    flights: SingleFlight<Arc<DnsResponse>>,
    metrics: Arc<dyn CacheMetricsSink>,
    classes: Vec<u16>,
    zones: Vec<String>,
    serve_stale: bool,
    stale_max_age: Duration,
}

impl CacheCore {
    fn is_cacheable_query(&self, ctx: &RequestContext, request: &DnsRequest) -> bool {
        if ctx.cache_bypass || !self.classes.contains(&request.question.qclass) {
            return false;
        }
        if self.zones.is_empty() {
            return true;
        }
        let qname = request.question.normalized_name();
        self.zones.iter().any(|zone| is_in_zone(&qname, zone))
    }

    /// Fresh or servable-stale copy of the cached answer, if any.
    fn lookup(
        self: &Arc<Self>,
        ctx: &RequestContext,
        request: &DnsRequest,
        key: CacheKey,
        next: &Next,
        now: Instant,
    ) -> Option<DnsResponse> {
        for tier in CacheTier::ALL {
            let Some(entry) = self.store.get(tier, &key) else {
                continue;
            };

            if !entry.is_expired(now) {
                let hits = entry.record_hit();
                self.metrics.record_hit(&ctx.zone, tier);

                let remaining = entry.remaining_ttl(now);
                debug!(
                    domain = %request.question.name,
                    record_type = %request.question.qtype,
                    tier = %tier,
                    remaining_ttl = remaining,
                    "Cache HIT"
                );

                if self.prefetch.should_prefetch(&entry, hits, now)
                    && entry.try_schedule_refresh()
                {
                    self.spawn_refresh(ctx, request, key, next);
                }

                let mut response = entry.response_with_ttl(remaining);
                response.readdress(request);
                return Some(response);
            }

            if self.serve_stale && entry.stale_for(now) < self.stale_max_age {
                self.metrics.record_stale_hit(&ctx.zone, tier);
                debug!(
                    domain = %request.question.name,
                    record_type = %request.question.qtype,
                    tier = %tier,
                    stale_secs = entry.stale_for(now).as_secs(),
                    "Cache STALE HIT"
                );

                if entry.try_schedule_refresh() {
                    self.spawn_refresh(ctx, request, key, next);
                }

                let mut response = entry.response_with_ttl(0);
                response.readdress(request);
                return Some(response);
            }

            if self.store.remove_if_same(tier, &key, &entry) {
                self.metrics.record_expiration(&ctx.zone, tier);
                self.metrics.set_size(&ctx.zone, tier, self.store.len(tier));
            }
            return None;
        }
        None
    }

    /// Delegates to the rest of the chain and stores what comes back. The
    /// shared result carries the stored TTL, so the first reply never shows
    /// more than later hits.
    async fn fill(
        self: Arc<Self>,
        ctx: RequestContext,
        request: DnsRequest,
        next: Next,
        key: CacheKey,
    ) -> Result<Arc<DnsResponse>, DomainError> {
        let mut response = next.run(&ctx, &request).await?;
        self.store_response(&ctx, key, &mut response);
        Ok(Arc::new(response))
    }

    fn store_response(&self, ctx: &RequestContext, key: CacheKey, response: &mut DnsResponse) {
        let zone = &*ctx.zone;
        let (tier, ttl) = match self.policy.evaluate(response) {
            CacheDecision::Store { tier, ttl } => (tier, ttl),
            CacheDecision::ZeroTtl { tier } => {
                debug!(domain = %response.question.name, tier = %tier, "Zero TTL, not caching");
                return;
            }
            CacheDecision::Uncacheable => {
                debug!(
                    domain = %response.question.name,
                    rcode = %response.response_code,
                    "Response not cacheable"
                );
                return;
            }
        };

        response.set_ttls(ttl);
        let entry = Arc::new(CacheEntry::new(response.clone(), ttl, Instant::now()));
        if let PutOutcome::Evicted(_) = self.store.put(tier, key, entry) {
            self.metrics.record_eviction(zone, tier);
        }
        debug!(
            domain = %response.question.name,
            tier = %tier,
            ttl = ttl,
            prefetch = ctx.prefetch,
            "Cache STORE"
        );
        for tier in CacheTier::ALL {
            self.metrics.set_size(zone, tier, self.store.len(tier));
        }
    }

    fn spawn_refresh(
        self: &Arc<Self>,
        ctx: &RequestContext,
        request: &DnsRequest,
        key: CacheKey,
        next: &Next,
    ) {
        let core = Arc::clone(self);
        let zone = Arc::clone(&ctx.zone);
        let domain = request.question.name.to_ascii();
        let fill = Arc::clone(self).fill(ctx.as_prefetch(), request.clone(), next.clone(), key);

        let refresh = async move {
            let result = fill.await;
            if let Err(e) = &result {
                warn!(error = %e, domain = %domain, zone = %zone, "Cache prefetch failed");
                core.metrics.record_prefetch_failure(&zone);
            }
            result
        };

        if self.flights.spawn_detached(key, refresh) {
            self.metrics.record_prefetch(&ctx.zone);
            debug!(domain = %request.question.name, "Cache prefetch scheduled");
        }
    }
}

/// Response cache link of a handler chain.
///
/// Answers from a two-tier LRU store when it can, otherwise delegates to the
/// rest of the chain through a single-flight coordinator and caches the
/// result according to the TTL policy.
pub struct CacheHandler {
    core: Arc<CacheCore>,
}

impl CacheHandler {
    pub fn new(config: &CacheConfig, metrics: Arc<dyn CacheMetricsSink>) -> Self {
        let store = TieredStore::new(config.success_capacity, config.denial_capacity);

        info!(
            success_capacity = config.success_capacity,
            denial_capacity = config.denial_capacity,
            min_ttl = config.min_ttl,
            max_ttl = config.max_ttl,
            prefetch_threshold = config.prefetch_threshold,
            serve_stale = config.serve_stale,
            "Response cache initialized"
        );

        Self {
            core: Arc::new(CacheCore {
                store,
                policy: TtlPolicy::from_config(config),
                prefetch: PrefetchPolicy::from_config(config),
                flights: SingleFlight::new(),
                metrics,
                classes: config.cacheable_class_codes(),
                zones: config.zones.iter().map(|z| normalize_fqdn(z)).collect(),
                serve_stale: config.serve_stale,
                stale_max_age: Duration::from_secs(config.stale_max_age),
            }),
        }
    }

    pub fn store(&self) -> &TieredStore {
        &self.core.store
    }

    pub fn len(&self, tier: CacheTier) -> usize {
        self.core.store.len(tier)
    }

    /// Number of fetches currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.core.flights.in_flight()
    }

    pub fn clear(&self) {
        self.core.store.clear();
    }
}

#[async_trait]
impl DnsHandler for CacheHandler {
    fn name(&self) -> &str {
        "cache"
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        next: Next,
    ) -> Result<DnsResponse, DomainError> {
        if !self.core.is_cacheable_query(ctx, request) {
            return next.run(ctx, request).await;
        }

        let key = CacheKey::for_request(request);

        // A refresh started by an earlier cache link must reach the source
        // and is neither a hit nor a miss here.
        if ctx.prefetch {
            let fill = Arc::clone(&self.core).fill(ctx.clone(), request.clone(), next, key);
            let flight = self.core.flights.fetch_or_join(key, fill).await;
            return flight.result.map(|response| response.reply_to(request));
        }

        if let Some(response) = self.core.lookup(ctx, request, key, &next, Instant::now()) {
            return Ok(response);
        }

        let fill = Arc::clone(&self.core).fill(ctx.clone(), request.clone(), next, key);
        let flight = self.core.flights.fetch_or_join(key, fill).await;

        debug!(
            domain = %request.question.name,
            record_type = %request.question.qtype,
            leader = flight.is_leader(),
            "Cache MISS"
        );

        match flight.result {
            Ok(response) => {
                match self.core.policy.classify(&response) {
                    Some(tier) => self.core.metrics.record_miss(&ctx.zone, tier),
                    None => self.core.metrics.record_uncacheable(&ctx.zone),
                }
                Ok(response.reply_to(request))
            }
            Err(e) => {
                self.core.metrics.record_uncacheable(&ctx.zone);
                Err(e)
            }
        }
    }
}
