use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{rdata, Name, RData, Record};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strata_dns_application::ports::{DnsHandler, Next, RequestContext};
use strata_dns_application::{DnsRequest, DnsResponse};
use strata_dns_domain::DomainError;

pub fn a_record(name: &str, ttl: u32, ip: Ipv4Addr) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), ttl, RData::A(rdata::A(ip)))
}

pub fn answer_for(request: &DnsRequest, ttl: u32) -> DnsResponse {
    DnsResponse::from_request(request, ResponseCode::NoError).with_answers(vec![a_record(
        &request.question.name.to_ascii(),
        ttl,
        Ipv4Addr::new(192, 0, 2, 1),
    )])
}

/// Terminal handler answering every query with one A record, or a fixed error.
pub struct MockHandler {
    name: String,
    ttl: u32,
    error: Option<DomainError>,
    calls: AtomicUsize,
}

impl MockHandler {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ttl: 300,
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &str, error: DomainError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(name)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsHandler for MockHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn serve(
        &self,
        _ctx: &RequestContext,
        request: &DnsRequest,
        _next: Next,
    ) -> Result<DnsResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(answer_for(request, self.ttl)),
        }
    }
}

/// Pass-through handler recording the zone it saw before delegating.
pub struct RecordingHandler {
    name: String,
    seen_zones: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            seen_zones: Mutex::new(Vec::new()),
        })
    }

    pub fn seen_zones(&self) -> Vec<String> {
        self.seen_zones.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        next: Next,
    ) -> Result<DnsResponse, DomainError> {
        self.seen_zones.lock().unwrap().push(ctx.zone.to_string());
        next.run(ctx, request).await
    }
}
