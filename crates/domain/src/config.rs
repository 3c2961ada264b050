pub mod cache;
pub mod errors;
pub mod local_records;
pub mod logging;
pub mod root;
pub mod server;
pub mod zone;

pub use cache::{CacheConfig, NegativeTtlSource};
pub use errors::ConfigError;
pub use local_records::LocalRecord;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zone::ZoneConfig;
