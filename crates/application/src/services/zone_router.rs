use std::sync::Arc;
use strata_dns_domain::{is_in_zone, label_count};

use super::HandlerChain;

/// Picks the chain of the most specific zone containing a query name.
pub struct ZoneRouter {
    // Most labels first, so the first match is the longest suffix.
    chains: Vec<Arc<HandlerChain>>,
}

impl ZoneRouter {
    pub fn new(chains: Vec<HandlerChain>) -> Self {
        let mut chains: Vec<Arc<HandlerChain>> = chains.into_iter().map(Arc::new).collect();
        chains.sort_by(|a, b| {
            label_count(b.zone())
                .cmp(&label_count(a.zone()))
                .then_with(|| a.zone().cmp(b.zone()))
        });
        Self { chains }
    }

    /// `qname` must be lower-cased and fully qualified.
    pub fn route(&self, qname: &str) -> Option<&Arc<HandlerChain>> {
        self.chains.iter().find(|c| is_in_zone(qname, c.zone()))
    }

    pub fn zones(&self) -> Vec<&str> {
        self.chains.iter().map(|c| c.zone().as_ref()).collect()
    }
}
