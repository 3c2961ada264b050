use hickory_proto::rr::{Name, RecordType};
use std::net::SocketAddr;
use strata_dns_application::{DnsQuestion, DnsRequest, EdnsInfo};
use strata_dns_domain::DomainError;

const HEADER_LEN: usize = 12;
const MAX_NAME_LEN: usize = 255;
const OPT_TYPE: u16 = 41;
const DO_BIT: u16 = 0x8000;
const MIN_UDP_PAYLOAD: u16 = 512;

/// A decoded single-question query.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub id: u16,
    pub name: Name,
    pub qtype: RecordType,
    pub qclass: u16,
    pub recursion_desired: bool,
    pub checking_disabled: bool,
    /// Present when the query carried an OPT record.
    pub edns: Option<EdnsInfo>,
    /// Byte offset where the question section ends.
    pub question_end: usize,
}

impl ParsedQuery {
    pub fn into_request(self, client: Option<SocketAddr>) -> DnsRequest {
        DnsRequest {
            id: self.id,
            question: DnsQuestion::new(self.name, self.qtype, self.qclass),
            recursion_desired: self.recursion_desired,
            checking_disabled: self.checking_disabled,
            edns: self.edns,
            client,
        }
    }

    /// Largest response the client accepts over UDP.
    pub fn max_udp_size(&self) -> u16 {
        self.edns
            .map(|e| e.udp_payload_size.max(MIN_UDP_PAYLOAD))
            .unwrap_or(MIN_UDP_PAYLOAD)
    }
}

/// Id of a packet long enough to carry a header, for error replies.
pub fn header_id(buf: &[u8]) -> Option<u16> {
    (buf.len() >= HEADER_LEN).then(|| read_u16(buf, 0))
}

/// Parses a client query.
///
/// Rejects responses, non-QUERY opcodes, anything other than exactly one
/// question, populated answer/authority sections and compression pointers
/// inside the question name.
pub fn parse_query(buf: &[u8]) -> Result<ParsedQuery, DomainError> {
    if buf.len() < HEADER_LEN + 5 {
        return Err(malformed("packet shorter than header and question"));
    }

    let id = read_u16(buf, 0);
    let flags = read_u16(buf, 2);

    if flags & 0x8000 != 0 {
        return Err(malformed("QR bit set"));
    }
    if flags & 0x7800 != 0 {
        return Err(malformed("unsupported opcode"));
    }

    let qdcount = read_u16(buf, 4);
    let ancount = read_u16(buf, 6);
    let nscount = read_u16(buf, 8);
    let arcount = read_u16(buf, 10);

    if qdcount != 1 {
        return Err(malformed("expected exactly one question"));
    }
    if ancount != 0 || nscount != 0 {
        return Err(malformed("answer or authority section in query"));
    }

    let (name, mut pos) = read_question_name(buf, HEADER_LEN)?;

    if pos + 4 > buf.len() {
        return Err(malformed("truncated question"));
    }
    let qtype = RecordType::from(read_u16(buf, pos));
    let qclass = read_u16(buf, pos + 2);
    pos += 4;
    let question_end = pos;

    let mut edns = None;
    for _ in 0..arcount {
        pos = skip_name(buf, pos)?;
        if pos + 10 > buf.len() {
            return Err(malformed("truncated additional record"));
        }
        let rr_type = read_u16(buf, pos);
        let rr_class = read_u16(buf, pos + 2);
        let ttl_flags = read_u16(buf, pos + 6);
        let rdlen = read_u16(buf, pos + 8) as usize;
        pos += 10 + rdlen;
        if pos > buf.len() {
            return Err(malformed("additional record overruns packet"));
        }

        if rr_type == OPT_TYPE {
            if edns.is_some() {
                return Err(malformed("more than one OPT record"));
            }
            edns = Some(EdnsInfo {
                udp_payload_size: rr_class.max(MIN_UDP_PAYLOAD),
                dnssec_ok: ttl_flags & DO_BIT != 0,
            });
        }
    }

    Ok(ParsedQuery {
        id,
        name,
        qtype,
        qclass,
        recursion_desired: flags & 0x0100 != 0,
        checking_disabled: flags & 0x0010 != 0,
        edns,
        question_end,
    })
}

fn read_question_name(buf: &[u8], mut pos: usize) -> Result<(Name, usize), DomainError> {
    let mut labels: Vec<&[u8]> = Vec::new();
    let mut wire_len = 1;

    loop {
        let Some(&len) = buf.get(pos) else {
            return Err(malformed("unterminated question name"));
        };
        let len = len as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        if len & 0xC0 != 0 {
            return Err(malformed("compressed or extended label in question"));
        }
        if pos + len > buf.len() {
            return Err(malformed("label overruns packet"));
        }
        wire_len += len + 1;
        if wire_len > MAX_NAME_LEN {
            return Err(malformed("question name too long"));
        }
        labels.push(&buf[pos..pos + len]);
        pos += len;
    }

    let mut name = Name::from_labels(labels)
        .map_err(|e| DomainError::InvalidDomainName(e.to_string()))?;
    name.set_fqdn(true);
    Ok((name, pos))
}

/// Skips a possibly compressed owner name.
fn skip_name(buf: &[u8], mut pos: usize) -> Result<usize, DomainError> {
    loop {
        let Some(&len) = buf.get(pos) else {
            return Err(malformed("unterminated record name"));
        };
        match len & 0xC0 {
            0x00 if len == 0 => return Ok(pos + 1),
            0x00 => pos += 1 + len as usize,
            0xC0 => return Ok(pos + 2),
            _ => return Err(malformed("unsupported label type")),
        }
    }
}

#[inline]
fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([buf[pos], buf[pos + 1]])
}

fn malformed(reason: &str) -> DomainError {
    DomainError::MalformedQuery(reason.to_string())
}
