use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::local_records::LocalRecord;
use crate::domain_name::normalize_fqdn;

/// One served zone: its optional cache link and the records answered locally.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    pub zone: String,

    #[serde(default)]
    pub cache: Option<CacheConfig>,

    #[serde(default)]
    pub records: Vec<LocalRecord>,
}

impl ZoneConfig {
    pub fn origin(&self) -> String {
        normalize_fqdn(&self.zone)
    }
}
