pub mod cache;
pub mod handlers;
pub mod wire;

pub use cache::{
    CacheEntry, CacheHandler, CacheKey, InMemoryCacheMetrics, PutOutcome, SingleFlight,
    TieredStore, TtlPolicy,
};
pub use handlers::LocalZoneHandler;
