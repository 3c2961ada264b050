use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Where the lifetime of a negative (NXDOMAIN / NODATA) answer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeTtlSource {
    /// `min(SOA.minimum, SOA record TTL)` from the authority section,
    /// falling back to `negative_ttl` when no SOA is present (RFC 2308).
    #[default]
    SoaMinimum,
    /// Always `negative_ttl`.
    Fixed,
}

/// Settings of one response cache link. All durations are seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub success_capacity: usize,

    #[serde(default = "default_capacity")]
    pub denial_capacity: usize,

    #[serde(default = "default_min_ttl")]
    pub min_ttl: u32,

    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,

    #[serde(default = "default_negative_min_ttl")]
    pub negative_min_ttl: u32,

    /// Ceiling for negative answers, and the fallback when no SOA is available.
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u32,

    #[serde(default)]
    pub negative_ttl_source: NegativeTtlSource,

    /// SERVFAIL answers are cached in the denial tier for this long. 0 disables.
    #[serde(default)]
    pub servfail_ttl: u32,

    #[serde(default)]
    pub allow_zero_ttl: bool,

    /// Fraction of the origin TTL below which a hit schedules a refresh.
    /// 0 disables prefetching.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: f64,

    #[serde(default = "default_prefetch_min_hits")]
    pub prefetch_min_hits: u64,

    #[serde(default = "default_cacheable_classes")]
    pub cacheable_classes: Vec<String>,

    #[serde(default)]
    pub serve_stale: bool,

    #[serde(default = "default_stale_max_age")]
    pub stale_max_age: u64,

    /// Restricts caching to these zones. Empty caches everything the chain serves.
    #[serde(default)]
    pub zones: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            success_capacity: default_capacity(),
            denial_capacity: default_capacity(),
            min_ttl: default_min_ttl(),
            max_ttl: default_max_ttl(),
            negative_min_ttl: default_negative_min_ttl(),
            negative_ttl: default_negative_ttl(),
            negative_ttl_source: NegativeTtlSource::default(),
            servfail_ttl: 0,
            allow_zero_ttl: false,
            prefetch_threshold: default_prefetch_threshold(),
            prefetch_min_hits: default_prefetch_min_hits(),
            cacheable_classes: default_cacheable_classes(),
            serve_stale: false,
            stale_max_age: default_stale_max_age(),
            zones: vec![],
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ttl > self.max_ttl {
            return Err(ConfigError::Validation(format!(
                "cache min_ttl ({}) is greater than max_ttl ({})",
                self.min_ttl, self.max_ttl
            )));
        }

        if self.negative_min_ttl > self.negative_ttl {
            return Err(ConfigError::Validation(format!(
                "cache negative_min_ttl ({}) is greater than negative_ttl ({})",
                self.negative_min_ttl, self.negative_ttl
            )));
        }

        if !(0.0..1.0).contains(&self.prefetch_threshold) {
            return Err(ConfigError::Validation(format!(
                "cache prefetch_threshold must be in [0, 1), got {}",
                self.prefetch_threshold
            )));
        }

        for class in &self.cacheable_classes {
            if class_code(class).is_none() {
                return Err(ConfigError::Validation(format!(
                    "unknown DNS class '{}' in cacheable_classes",
                    class
                )));
            }
        }

        Ok(())
    }

    /// Numeric class codes of `cacheable_classes`. Unknown names are skipped.
    pub fn cacheable_class_codes(&self) -> Vec<u16> {
        self.cacheable_classes
            .iter()
            .filter_map(|c| class_code(c))
            .collect()
    }
}

/// Maps a class mnemonic (or `CLASSnn`) to its numeric code.
pub fn class_code(name: &str) -> Option<u16> {
    let upper = name.trim().to_ascii_uppercase();
    match upper.as_str() {
        "IN" => Some(1),
        "CH" | "CHAOS" => Some(3),
        "HS" | "HESIOD" => Some(4),
        "NONE" => Some(254),
        "ANY" | "*" => Some(255),
        other => other.strip_prefix("CLASS").and_then(|n| n.parse().ok()),
    }
}

fn default_capacity() -> usize {
    9984
}

fn default_min_ttl() -> u32 {
    5
}

fn default_max_ttl() -> u32 {
    3600
}

fn default_negative_min_ttl() -> u32 {
    5
}

fn default_negative_ttl() -> u32 {
    1800
}

fn default_prefetch_threshold() -> f64 {
    0.1
}

fn default_prefetch_min_hits() -> u64 {
    1
}

fn default_cacheable_classes() -> Vec<String> {
    vec!["IN".to_string()]
}

fn default_stale_max_age() -> u64 {
    3600
}
