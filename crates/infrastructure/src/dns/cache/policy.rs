use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, Record};
use strata_dns_application::DnsResponse;
use strata_dns_domain::{CacheConfig, CacheTier, NegativeTtlSource};

/// Outcome of running a fetched response through the TTL policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    Store { tier: CacheTier, ttl: u32 },
    /// Classified into `tier` but its lifetime came out as zero.
    ZeroTtl { tier: CacheTier },
    Uncacheable,
}

#[derive(Debug, Clone)]
pub struct TtlPolicy {
    min_ttl: u32,
    max_ttl: u32,
    negative_min_ttl: u32,
    negative_ttl: u32,
    negative_ttl_source: NegativeTtlSource,
    servfail_ttl: u32,
    allow_zero_ttl: bool,
}

impl TtlPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            min_ttl: config.min_ttl,
            max_ttl: config.max_ttl,
            negative_min_ttl: config.negative_min_ttl,
            negative_ttl: config.negative_ttl,
            negative_ttl_source: config.negative_ttl_source,
            servfail_ttl: config.servfail_ttl,
            allow_zero_ttl: config.allow_zero_ttl,
        }
    }

    /// Which tier a response belongs to, ignoring its TTL.
    pub fn classify(&self, response: &DnsResponse) -> Option<CacheTier> {
        if response.truncated {
            return None;
        }
        match response.response_code {
            ResponseCode::NoError if response.has_answers() => Some(CacheTier::Success),
            ResponseCode::NoError | ResponseCode::NXDomain => Some(CacheTier::Denial),
            ResponseCode::ServFail if self.servfail_ttl > 0 => Some(CacheTier::Denial),
            _ => None,
        }
    }

    pub fn evaluate(&self, response: &DnsResponse) -> CacheDecision {
        let Some(tier) = self.classify(response) else {
            return CacheDecision::Uncacheable;
        };

        let ttl = match tier {
            CacheTier::Success => self.success_ttl(response),
            CacheTier::Denial if response.is_servfail() => self.servfail_ttl,
            CacheTier::Denial => self.denial_ttl(response),
        };

        if ttl == 0 && !self.allow_zero_ttl {
            CacheDecision::ZeroTtl { tier }
        } else {
            CacheDecision::Store { tier, ttl }
        }
    }

    fn success_ttl(&self, response: &DnsResponse) -> u32 {
        response
            .min_answer_ttl()
            .unwrap_or(self.min_ttl)
            .max(self.min_ttl)
            .min(self.max_ttl)
    }

    fn denial_ttl(&self, response: &DnsResponse) -> u32 {
        let ttl = match self.negative_ttl_source {
            NegativeTtlSource::SoaMinimum => {
                extract_negative_ttl(&response.authority).unwrap_or(self.negative_ttl)
            }
            NegativeTtlSource::Fixed => self.negative_ttl,
        };
        ttl.max(self.negative_min_ttl).min(self.negative_ttl)
    }
}

/// RFC 2308 negative TTL: the lesser of the SOA MINIMUM field and the TTL of
/// the SOA record itself.
pub fn extract_negative_ttl(authority_records: &[Record]) -> Option<u32> {
    authority_records.iter().find_map(|r| {
        if let RData::SOA(soa) = r.data() {
            Some(soa.minimum().min(r.ttl()))
        } else {
            None
        }
    })
}
