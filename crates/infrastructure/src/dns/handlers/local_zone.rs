use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{self, SOA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use strata_dns_application::ports::{DnsHandler, Next, RequestContext};
use strata_dns_application::{DnsRequest, DnsResponse, CLASS_IN};
use strata_dns_domain::{is_in_zone, normalize_fqdn, DomainError, LocalRecord, ZoneConfig};
use tracing::{debug, info};

const SOA_TTL: u32 = 3600;
const SOA_MINIMUM: u32 = 300;
const MAX_CNAME_HOPS: usize = 8;

/// Authoritative answers for one zone from records held in memory.
///
/// Names outside the zone, and non-IN queries, are passed down the chain.
pub struct LocalZoneHandler {
    origin: String,
    soa: Record,
    records: HashMap<String, Vec<Record>>,
}

impl LocalZoneHandler {
    pub fn from_config(zone: &ZoneConfig) -> Result<Self, DomainError> {
        Self::new(&zone.zone, &zone.records)
    }

    pub fn new(zone: &str, local_records: &[LocalRecord]) -> Result<Self, DomainError> {
        let origin = normalize_fqdn(zone);
        let soa = build_soa(&origin)?;

        let mut records: HashMap<String, Vec<Record>> = HashMap::new();
        for local in local_records {
            let owner = local.fqdn(&origin);
            if !is_in_zone(&owner, &origin) {
                return Err(DomainError::ConfigError(format!(
                    "record '{}' is outside zone '{}'",
                    owner, origin
                )));
            }
            let record = build_record(&owner, local)?;
            records.entry(owner).or_default().push(record);
        }

        info!(zone = %origin, records = local_records.len(), "Local zone loaded");

        Ok(Self {
            origin,
            soa,
            records,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn lookup(&self, qname: &str, qtype: RecordType) -> Vec<Record> {
        let mut answers = Vec::new();
        let mut current = qname.to_string();

        for _ in 0..MAX_CNAME_HOPS {
            let Some(rrset) = self.records.get(&current) else {
                break;
            };

            let matching: Vec<Record> = rrset
                .iter()
                .filter(|r| r.record_type() == qtype)
                .cloned()
                .collect();
            if !matching.is_empty() {
                answers.extend(matching);
                break;
            }

            let cname = rrset.iter().find(|r| r.record_type() == RecordType::CNAME);
            match cname.map(|r| (r, r.data())) {
                Some((record, RData::CNAME(target))) if qtype != RecordType::CNAME => {
                    answers.push(record.clone());
                    current = normalize_fqdn(&target.0.to_ascii());
                    if !is_in_zone(&current, &self.origin) {
                        break;
                    }
                }
                _ => break,
            }
        }

        answers
    }

    /// True when some record sits strictly below `qname` (an empty non-terminal).
    fn has_descendants(&self, qname: &str) -> bool {
        self.records
            .keys()
            .any(|owner| owner != qname && is_in_zone(owner, qname))
    }
}

#[async_trait]
impl DnsHandler for LocalZoneHandler {
    fn name(&self) -> &str {
        "local_zone"
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        request: &DnsRequest,
        next: Next,
    ) -> Result<DnsResponse, DomainError> {
        let qname = request.question.normalized_name();
        if request.question.qclass != CLASS_IN || !is_in_zone(&qname, &self.origin) {
            return next.run(ctx, request).await;
        }

        let qtype = request.question.qtype;
        let response = DnsResponse::from_request(request, ResponseCode::NoError)
            .with_authoritative(true);

        if qtype == RecordType::SOA && qname == self.origin {
            return Ok(response.with_answers(vec![self.soa.clone()]));
        }

        let answers = self.lookup(&qname, qtype);
        if !answers.is_empty() {
            debug!(
                domain = %qname,
                record_type = %qtype,
                answers = answers.len(),
                "Local answer"
            );
            return Ok(response.with_answers(answers));
        }

        let exists = qname == self.origin
            || self.records.contains_key(&qname)
            || self.has_descendants(&qname);

        let mut response = response.with_authority(vec![self.soa.clone()]);
        if !exists {
            response.response_code = ResponseCode::NXDomain;
        }
        debug!(
            domain = %qname,
            record_type = %qtype,
            rcode = %response.response_code,
            "Local negative answer"
        );
        Ok(response)
    }
}

fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_ascii(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e)))
}

fn build_soa(origin: &str) -> Result<Record, DomainError> {
    let zone = parse_name(origin)?;
    let rname = if origin == "." {
        parse_name("hostmaster.")?
    } else {
        parse_name(&format!("hostmaster.{}", origin))?
    };
    let soa = SOA::new(zone.clone(), rname, 1, 3600, 900, 604_800, SOA_MINIMUM);
    Ok(Record::from_rdata(zone, SOA_TTL, RData::SOA(soa)))
}

fn build_record(owner: &str, local: &LocalRecord) -> Result<Record, DomainError> {
    let name = parse_name(owner)?;
    let invalid = |kind: &str| {
        DomainError::ConfigError(format!(
            "invalid {} value '{}' for '{}'",
            kind, local.value, owner
        ))
    };

    let rdata = match local.record_type.to_ascii_uppercase().as_str() {
        "A" => {
            let ip = Ipv4Addr::from_str(local.value.trim()).map_err(|_| invalid("A"))?;
            RData::A(rdata::A(ip))
        }
        "AAAA" => {
            let ip = Ipv6Addr::from_str(local.value.trim()).map_err(|_| invalid("AAAA"))?;
            RData::AAAA(rdata::AAAA(ip))
        }
        "CNAME" => {
            let target = parse_name(&normalize_fqdn(&local.value))?;
            RData::CNAME(rdata::CNAME(target))
        }
        "TXT" => RData::TXT(rdata::TXT::new(vec![local.value.clone()])),
        other => {
            return Err(DomainError::ConfigError(format!(
                "unsupported record type '{}' for '{}'",
                other, owner
            )))
        }
    };

    Ok(Record::from_rdata(name, local.ttl_or_default(), rdata))
}
