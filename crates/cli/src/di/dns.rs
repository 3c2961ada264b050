use std::sync::Arc;
use strata_dns_application::ports::{CacheMetricsSink, DnsHandler};
use strata_dns_application::services::{HandlerChain, ZoneRouter};
use strata_dns_application::use_cases::HandleDnsQueryUseCase;
use strata_dns_domain::{Config, ZoneConfig};
use strata_dns_infrastructure::dns::{CacheHandler, InMemoryCacheMetrics, LocalZoneHandler};
use tracing::info;

pub struct DnsServices {
    pub metrics: Arc<InMemoryCacheMetrics>,
    pub router: Arc<ZoneRouter>,
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!(zones = config.zones.len(), "Initializing DNS services");

        let metrics = Arc::new(InMemoryCacheMetrics::new());
        let sink: Arc<dyn CacheMetricsSink> = metrics.clone();

        let chains = config
            .zones
            .iter()
            .map(|zone| Self::build_chain(zone, &sink))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let router = Arc::new(ZoneRouter::new(chains));
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(router.clone()));

        Ok(Self {
            metrics,
            router,
            handler_use_case,
        })
    }

    fn build_chain(
        zone: &ZoneConfig,
        sink: &Arc<dyn CacheMetricsSink>,
    ) -> anyhow::Result<HandlerChain> {
        let mut handlers: Vec<Arc<dyn DnsHandler>> = Vec::with_capacity(2);

        if let Some(cache_config) = &zone.cache {
            handlers.push(Arc::new(CacheHandler::new(cache_config, sink.clone())));
        }
        handlers.push(Arc::new(LocalZoneHandler::from_config(zone)?));

        let chain = HandlerChain::new(&zone.zone, handlers);
        info!(
            zone = %chain.zone(),
            handlers = ?chain.handler_names(),
            "Handler chain built"
        );
        Ok(chain)
    }
}
