use serde::{Deserialize, Serialize};
use std::fmt;

/// The two partitions of the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheTier {
    /// Positive answers carrying at least one answer record.
    Success,
    /// NXDOMAIN, NODATA and negative-cacheable server failures.
    Denial,
}

impl CacheTier {
    pub const ALL: [CacheTier; 2] = [CacheTier::Success, CacheTier::Denial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Denial => "denial",
        }
    }

    /// The tier a key must be evicted from when it is stored in `self`.
    pub fn other(&self) -> Self {
        match self {
            Self::Success => Self::Denial,
            Self::Denial => Self::Success,
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
