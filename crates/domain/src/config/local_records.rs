use serde::{Deserialize, Serialize};

use crate::domain_name::normalize_fqdn;

/// A record served by the in-memory zone handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalRecord {
    /// Owner name, either fully qualified or relative to the zone.
    pub name: String,

    /// `A`, `AAAA`, `CNAME` or `TXT`.
    pub record_type: String,

    pub value: String,

    #[serde(default)]
    pub ttl: Option<u32>,
}

impl LocalRecord {
    /// Fully qualified, lower-cased owner name with a trailing dot.
    pub fn fqdn(&self, zone: &str) -> String {
        let name = self.name.to_ascii_lowercase();
        if name == "@" {
            return normalize_fqdn(zone);
        }
        if name.ends_with('.') {
            return name;
        }
        let zone = normalize_fqdn(zone);
        if zone == "." {
            format!("{}.", name)
        } else {
            format!("{}.{}", name, zone)
        }
    }

    pub fn ttl_or_default(&self) -> u32 {
        self.ttl.unwrap_or(300)
    }
}
