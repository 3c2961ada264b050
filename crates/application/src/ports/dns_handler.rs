use async_trait::async_trait;
use std::sync::Arc;
use strata_dns_domain::DomainError;

use crate::message::{DnsRequest, DnsResponse};

/// Per-request state handed down the chain.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Zone whose chain is serving the request; labels cache metrics.
    pub zone: Arc<str>,
    /// Skip every cache link.
    pub cache_bypass: bool,
    /// Set on background refreshes started by a cache link.
    pub prefetch: bool,
}

impl RequestContext {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: Arc::from(zone),
            cache_bypass: false,
            prefetch: false,
        }
    }

    pub fn with_cache_bypass(mut self, cache_bypass: bool) -> Self {
        self.cache_bypass = cache_bypass;
        self
    }

    /// Same request state, rebound to `zone`.
    pub fn for_zone(&self, zone: &Arc<str>) -> Self {
        Self {
            zone: Arc::clone(zone),
            ..self.clone()
        }
    }

    pub fn as_prefetch(&self) -> Self {
        Self {
            prefetch: true,
            ..self.clone()
        }
    }
}

/// One link of a zone's handler chain.
///
/// A handler either produces a response itself or declines by calling
/// `next.run(ctx, request)`.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn serve(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        next: Next,
    ) -> Result<DnsResponse, DomainError>;
}

/// Owned cursor over the rest of a chain.
///
/// Cheap to clone and `'static`, so it can be moved into spawned tasks.
#[derive(Clone)]
pub struct Next {
    handlers: Arc<[Arc<dyn DnsHandler>]>,
    index: usize,
}

impl Next {
    pub fn new(handlers: Arc<[Arc<dyn DnsHandler>]>) -> Self {
        Self { handlers, index: 0 }
    }

    /// A cursor over an empty chain.
    pub fn empty() -> Self {
        Self::new(Arc::from(Vec::<Arc<dyn DnsHandler>>::new()))
    }

    pub fn remaining(&self) -> usize {
        self.handlers.len().saturating_sub(self.index)
    }

    pub async fn run(
        self,
        ctx: &RequestContext,
        request: &DnsRequest,
    ) -> Result<DnsResponse, DomainError> {
        let Some(handler) = self.handlers.get(self.index).cloned() else {
            return Err(DomainError::NoNextHandler(ctx.zone.to_string()));
        };
        let next = Next {
            handlers: self.handlers,
            index: self.index + 1,
        };
        handler.serve(ctx, request, next).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = self.index.min(self.handlers.len());
        let names: Vec<&str> = self.handlers[start..].iter().map(|h| h.name()).collect();
        f.debug_struct("Next").field("handlers", &names).finish()
    }
}
