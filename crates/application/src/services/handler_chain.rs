use std::sync::Arc;
use strata_dns_domain::{normalize_fqdn, DomainError};

use crate::message::{DnsRequest, DnsResponse};
use crate::ports::{DnsHandler, Next, RequestContext};

/// The ordered, immutable handler list serving one zone.
pub struct HandlerChain {
    zone: Arc<str>,
    handlers: Arc<[Arc<dyn DnsHandler>]>,
}

impl HandlerChain {
    pub fn new(zone: &str, handlers: Vec<Arc<dyn DnsHandler>>) -> Self {
        Self {
            zone: Arc::from(normalize_fqdn(zone)),
            handlers: Arc::from(handlers),
        }
    }

    pub fn zone(&self) -> &Arc<str> {
        &self.zone
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub async fn serve(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        Next::new(Arc::clone(&self.handlers)).run(ctx, request).await
    }
}
