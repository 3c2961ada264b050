pub mod entry;
pub mod handler;
pub mod key;
pub mod metrics;
pub mod policy;
pub mod prefetch;
pub mod single_flight;
pub mod storage;

pub use entry::CacheEntry;
pub use handler::CacheHandler;
pub use key::CacheKey;
pub use metrics::InMemoryCacheMetrics;
pub use policy::{extract_negative_ttl, CacheDecision, TtlPolicy};
pub use prefetch::PrefetchPolicy;
pub use single_flight::{Flight, SingleFlight};
pub use storage::{PutOutcome, TieredStore};
