use hickory_proto::rr::RecordType;
use std::sync::Arc;
use strata_dns_application::ports::{DnsHandler, RequestContext, ZoneCacheSnapshot};
use strata_dns_application::services::HandlerChain;
use strata_dns_application::{DnsRequest, DnsResponse};
use strata_dns_domain::{CacheConfig, DomainError};
use strata_dns_infrastructure::dns::{CacheHandler, InMemoryCacheMetrics};

use super::MockUpstream;

pub const ZONE: &str = "example.org.";

/// A `cache -> mock upstream` chain for one zone.
pub struct Harness {
    pub cache: Arc<CacheHandler>,
    pub upstream: Arc<MockUpstream>,
    pub metrics: Arc<InMemoryCacheMetrics>,
    chain: HandlerChain,
}

impl Harness {
    pub fn new(config: CacheConfig, upstream: MockUpstream) -> Arc<Self> {
        let metrics = Arc::new(InMemoryCacheMetrics::new());
        let cache = Arc::new(CacheHandler::new(&config, metrics.clone()));
        let upstream = Arc::new(upstream);
        let chain = HandlerChain::new(
            ZONE,
            vec![cache.clone() as Arc<dyn DnsHandler>, upstream.clone()],
        );

        Arc::new(Self {
            cache,
            upstream,
            metrics,
            chain,
        })
    }

    pub fn context(&self) -> RequestContext {
        RequestContext::new(ZONE)
    }

    pub async fn query(&self, name: &str, qtype: RecordType) -> Result<DnsResponse, DomainError> {
        let request = DnsRequest::parse(name, qtype).unwrap();
        self.send(&request).await
    }

    pub async fn send(&self, request: &DnsRequest) -> Result<DnsResponse, DomainError> {
        self.chain.serve(&self.context(), request).await
    }

    pub async fn send_with(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        self.chain.serve(ctx, request).await
    }

    pub fn snapshot(&self) -> ZoneCacheSnapshot {
        self.metrics
            .snapshot()
            .zone(ZONE)
            .cloned()
            .unwrap_or_default()
    }
}
