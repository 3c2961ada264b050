use hickory_proto::op::ResponseCode;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use strata_dns_application::DnsResponse;
use strata_dns_domain::DomainError;

const OPT_TYPE: u16 = 41;
const DO_BIT: u16 = 0x8000;
const MIN_UDP_PAYLOAD: usize = 512;

/// Encodes `response` for UDP, honouring the client's advertised payload size.
pub fn encode_response(response: &DnsResponse) -> Result<Vec<u8>, DomainError> {
    let limit = response
        .edns
        .map(|e| usize::from(e.udp_payload_size).max(MIN_UDP_PAYLOAD))
        .unwrap_or(MIN_UDP_PAYLOAD);
    encode_with_limit(response, limit)
}

/// Encodes `response`; when it does not fit in `max_size` bytes only the
/// header, question and OPT record are sent, with TC set.
pub fn encode_with_limit(response: &DnsResponse, max_size: usize) -> Result<Vec<u8>, DomainError> {
    let full = encode(response, true)?;
    if full.len() <= max_size {
        return Ok(full);
    }
    encode(response, false)
}

/// Header-only reply carrying `rcode`, for queries that could not be parsed.
pub fn encode_error(id: u16, rcode: ResponseCode) -> Vec<u8> {
    let flags = 0x8000 | (u16::from(rcode) & 0x000F);
    let mut buf = Vec::with_capacity(12);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&flags.to_be_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    buf
}

fn encode(response: &DnsResponse, include_records: bool) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);

    let (answers, authority, additional) = if include_records {
        (
            response.answers.as_slice(),
            response.authority.as_slice(),
            response.additional.as_slice(),
        )
    } else {
        (&[][..], &[][..], &[][..])
    };
    let opt_count = u16::from(response.edns.is_some());

    encoder.emit_u16(response.id).map_err(to_encode_error)?;
    encoder
        .emit_u16(header_flags(response, !include_records))
        .map_err(to_encode_error)?;
    encoder.emit_u16(1).map_err(to_encode_error)?;
    encoder.emit_u16(count(answers.len())?).map_err(to_encode_error)?;
    encoder.emit_u16(count(authority.len())?).map_err(to_encode_error)?;
    encoder
        .emit_u16(count(additional.len())? + opt_count)
        .map_err(to_encode_error)?;

    response
        .question
        .name
        .emit(&mut encoder)
        .map_err(to_encode_error)?;
    encoder
        .emit_u16(u16::from(response.question.qtype))
        .map_err(to_encode_error)?;
    encoder
        .emit_u16(response.question.qclass)
        .map_err(to_encode_error)?;

    for record in answers.iter().chain(authority).chain(additional) {
        record.emit(&mut encoder).map_err(to_encode_error)?;
    }

    if let Some(edns) = response.edns {
        let flags = if edns.dnssec_ok { DO_BIT } else { 0 };
        encoder.emit(0).map_err(to_encode_error)?;
        encoder.emit_u16(OPT_TYPE).map_err(to_encode_error)?;
        encoder
            .emit_u16(edns.udp_payload_size)
            .map_err(to_encode_error)?;
        encoder.emit(0).map_err(to_encode_error)?;
        encoder.emit(0).map_err(to_encode_error)?;
        encoder.emit_u16(flags).map_err(to_encode_error)?;
        encoder.emit_u16(0).map_err(to_encode_error)?;
    }

    Ok(buf)
}

fn header_flags(response: &DnsResponse, truncated: bool) -> u16 {
    let mut flags = 0x8000;
    if response.authoritative {
        flags |= 0x0400;
    }
    if response.truncated || truncated {
        flags |= 0x0200;
    }
    if response.recursion_desired {
        flags |= 0x0100;
    }
    if response.recursion_available {
        flags |= 0x0080;
    }
    if response.authentic_data {
        flags |= 0x0020;
    }
    if response.checking_disabled {
        flags |= 0x0010;
    }
    flags | (u16::from(response.response_code) & 0x000F)
}

fn count(n: usize) -> Result<u16, DomainError> {
    u16::try_from(n).map_err(|_| DomainError::Encode(format!("{} records in one section", n)))
}

fn to_encode_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::Encode(e.to_string())
}
