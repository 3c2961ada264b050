use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Name, Record, RecordType};
use std::net::SocketAddr;
use strata_dns_domain::DomainError;

pub const CLASS_IN: u16 = 1;

/// Default EDNS payload size advertised in our own responses.
pub const DEFAULT_EDNS_PAYLOAD: u16 = 1232;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: Name,
    pub qtype: RecordType,
    pub qclass: u16,
}

impl DnsQuestion {
    pub fn new(name: Name, qtype: RecordType, qclass: u16) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    /// Parses `name` as an IN-class question; relative names are made absolute.
    /// The caller's spelling is kept as is.
    pub fn parse(name: &str, qtype: RecordType) -> Result<Self, DomainError> {
        let mut parsed = Name::from_ascii(name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e))
        })?;
        parsed.set_fqdn(true);
        Ok(Self::new(parsed, qtype, CLASS_IN))
    }

    /// Lower-cased, fully qualified owner name.
    pub fn normalized_name(&self) -> String {
        let mut name = self.name.to_lowercase();
        name.set_fqdn(true);
        name.to_ascii()
    }
}

/// EDNS(0) parameters of a query, echoed in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdnsInfo {
    pub udp_payload_size: u16,
    pub dnssec_ok: bool,
}

impl Default for EdnsInfo {
    fn default() -> Self {
        Self {
            udp_payload_size: DEFAULT_EDNS_PAYLOAD,
            dnssec_ok: false,
        }
    }
}

/// A single-question client query.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub id: u16,
    pub question: DnsQuestion,
    pub recursion_desired: bool,
    pub checking_disabled: bool,
    pub edns: Option<EdnsInfo>,
    pub client: Option<SocketAddr>,
}

impl DnsRequest {
    pub fn new(question: DnsQuestion) -> Self {
        Self {
            id: 0,
            question,
            recursion_desired: true,
            checking_disabled: false,
            edns: None,
            client: None,
        }
    }

    pub fn parse(name: &str, qtype: RecordType) -> Result<Self, DomainError> {
        Ok(Self::new(DnsQuestion::parse(name, qtype)?))
    }

    pub fn with_id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    /// Sets the DO bit, adding an EDNS section when the query has none.
    pub fn with_dnssec_ok(mut self, dnssec_ok: bool) -> Self {
        let mut edns = self.edns.unwrap_or_default();
        edns.dnssec_ok = dnssec_ok;
        self.edns = Some(edns);
        self
    }

    pub fn with_checking_disabled(mut self, checking_disabled: bool) -> Self {
        self.checking_disabled = checking_disabled;
        self
    }

    pub fn with_client(mut self, client: SocketAddr) -> Self {
        self.client = Some(client);
        self
    }

    pub fn dnssec_ok(&self) -> bool {
        self.edns.map(|e| e.dnssec_ok).unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,
    pub question: DnsQuestion,
    pub response_code: ResponseCode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
    pub edns: Option<EdnsInfo>,
}

impl DnsResponse {
    /// An empty response to `request` with the given code.
    pub fn from_request(request: &DnsRequest, response_code: ResponseCode) -> Self {
        Self {
            id: request.id,
            question: request.question.clone(),
            response_code,
            authoritative: false,
            truncated: false,
            recursion_desired: request.recursion_desired,
            recursion_available: false,
            authentic_data: false,
            checking_disabled: request.checking_disabled,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
            edns: request.edns,
        }
    }

    pub fn with_answers(mut self, answers: Vec<Record>) -> Self {
        self.answers = answers;
        self
    }

    pub fn with_authority(mut self, authority: Vec<Record>) -> Self {
        self.authority = authority;
        self
    }

    pub fn with_authoritative(mut self, authoritative: bool) -> Self {
        self.authoritative = authoritative;
        self
    }

    /// Copy of this response addressed to `request`: id, question spelling
    /// and query flags come from the request, sections and rcode from `self`.
    pub fn reply_to(&self, request: &DnsRequest) -> Self {
        let mut reply = self.clone();
        reply.readdress(request);
        reply
    }

    /// In-place variant of [`reply_to`](Self::reply_to).
    pub fn readdress(&mut self, request: &DnsRequest) {
        self.id = request.id;
        self.question = request.question.clone();
        self.recursion_desired = request.recursion_desired;
        self.checking_disabled = request.checking_disabled;
        self.edns = request.edns;
    }

    /// Rewrites the TTL of every record in every section.
    pub fn set_ttls(&mut self, ttl: u32) {
        for record in self
            .answers
            .iter_mut()
            .chain(self.authority.iter_mut())
            .chain(self.additional.iter_mut())
        {
            record.set_ttl(ttl);
        }
    }

    pub fn min_answer_ttl(&self) -> Option<u32> {
        self.answers.iter().map(|r| r.ttl()).min()
    }

    pub fn is_nxdomain(&self) -> bool {
        self.response_code == ResponseCode::NXDomain
    }

    pub fn is_nodata(&self) -> bool {
        self.response_code == ResponseCode::NoError && self.answers.is_empty()
    }

    pub fn is_servfail(&self) -> bool {
        self.response_code == ResponseCode::ServFail
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }

}
