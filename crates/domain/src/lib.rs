//! Strata DNS Domain Layer
//!
//! Configuration model, error taxonomy and the small value types shared by
//! every other crate. Nothing here knows about the DNS wire format.

pub mod cache_tier;
pub mod config;
pub mod domain_name;
pub mod errors;

pub use cache_tier::CacheTier;
pub use config::{
    CacheConfig, CliOverrides, Config, ConfigError, LocalRecord, LoggingConfig,
    NegativeTtlSource, ServerConfig, ZoneConfig,
};
pub use domain_name::{is_in_zone, label_count, normalize_fqdn};
pub use errors::DomainError;
