use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{self, SOA};
use hickory_proto::rr::{Name, RData, Record};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use strata_dns_application::ports::{DnsHandler, Next, RequestContext};
use strata_dns_application::{DnsRequest, DnsResponse};
use strata_dns_domain::DomainError;

pub fn soa_record(zone: &str, minimum: u32, record_ttl: u32) -> Record {
    let name = Name::from_str(zone).unwrap();
    let mname = Name::from_str(&format!("ns1.{}", zone)).unwrap();
    let rname = Name::from_str(&format!("hostmaster.{}", zone)).unwrap();
    let soa = SOA::new(mname, rname, 1, 3600, 900, 604800, minimum);
    Record::from_rdata(name, record_ttl, RData::SOA(soa))
}

#[derive(Clone, Debug)]
pub enum Behavior {
    /// One A record whose last octet is the call number.
    Answer { ttl: u32 },
    NxDomain { soa: Option<(u32, u32)> },
    NoData { soa: Option<(u32, u32)> },
    ServFail,
    Truncated { ttl: u32 },
    Fail(DomainError),
}

/// Terminal handler standing in for an upstream forwarder.
pub struct MockUpstream {
    behavior: Mutex<Behavior>,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
    calls_by_name: Mutex<HashMap<String, usize>>,
}

impl MockUpstream {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            delay: Mutex::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
            calls_by_name: Mutex::new(HashMap::new()),
        }
    }

    pub fn answering(ttl: u32) -> Self {
        Self::new(Behavior::Answer { ttl })
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls_by_name
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DnsHandler for MockUpstream {
    fn name(&self) -> &str {
        "mock_upstream"
    }

    async fn serve(
        &self,
        _ctx: &RequestContext,
        request: &DnsRequest,
        _next: Next,
    ) -> Result<DnsResponse, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .calls_by_name
            .lock()
            .unwrap()
            .entry(request.question.normalized_name())
            .or_default() += 1;

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        let soa = |soa: Option<(u32, u32)>| {
            soa.map(|(minimum, ttl)| vec![soa_record("example.org.", minimum, ttl)])
                .unwrap_or_default()
        };
        let answer = |ttl: u32| {
            Record::from_rdata(
                request.question.name.clone(),
                ttl,
                RData::A(rdata::A(Ipv4Addr::new(10, 0, 0, call as u8))),
            )
        };

        match behavior {
            Behavior::Answer { ttl } => Ok(DnsResponse::from_request(request, ResponseCode::NoError)
                .with_answers(vec![answer(ttl)])),
            Behavior::NxDomain { soa: s } => {
                Ok(DnsResponse::from_request(request, ResponseCode::NXDomain).with_authority(soa(s)))
            }
            Behavior::NoData { soa: s } => {
                Ok(DnsResponse::from_request(request, ResponseCode::NoError).with_authority(soa(s)))
            }
            Behavior::ServFail => Ok(DnsResponse::from_request(request, ResponseCode::ServFail)),
            Behavior::Truncated { ttl } => {
                let mut response = DnsResponse::from_request(request, ResponseCode::NoError)
                    .with_answers(vec![answer(ttl)]);
                response.truncated = true;
                Ok(response)
            }
            Behavior::Fail(e) => Err(e),
        }
    }
}
