use hickory_proto::rr::RecordType;
use sha2::{Digest, Sha256};
use strata_dns_application::DnsRequest;
use strata_dns_domain::normalize_fqdn;

const DO_FLAG: u8 = 0x01;
const CD_FLAG: u8 = 0x02;

/// Truncated SHA-256 of everything that selects a distinct cached answer.
///
/// Names are case-folded and made fully qualified first, so `Example.ORG`
/// and `example.org.` share an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; 16]);

impl CacheKey {
    pub fn compute(
        name: &str,
        qtype: RecordType,
        qclass: u16,
        dnssec_ok: bool,
        checking_disabled: bool,
    ) -> Self {
        let name = normalize_fqdn(name);

        let mut flags = 0u8;
        if dnssec_ok {
            flags |= DO_FLAG;
        }
        if checking_disabled {
            flags |= CD_FLAG;
        }

        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(u16::from(qtype).to_be_bytes());
        hasher.update(qclass.to_be_bytes());
        hasher.update([flags]);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(bytes)
    }

    pub fn for_request(request: &DnsRequest) -> Self {
        Self::compute(
            &request.question.normalized_name(),
            request.question.qtype,
            request.question.qclass,
            request.dnssec_ok(),
            request.checking_disabled,
        )
    }
}
