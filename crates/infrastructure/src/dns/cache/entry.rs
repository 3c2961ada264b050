use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use strata_dns_application::DnsResponse;
use tokio::time::Instant;

/// A stored response plus the bookkeeping needed to age it.
///
/// Entries are immutable apart from the hit counter and the refresh flag;
/// readers always get a copy of the response.
#[derive(Debug)]
pub struct CacheEntry {
    response: DnsResponse,
    origin_ttl: u32,
    expires_at: Instant,
    hits: AtomicU64,
    refresh_scheduled: AtomicBool,
}

impl CacheEntry {
    pub fn new(response: DnsResponse, origin_ttl: u32, now: Instant) -> Self {
        Self {
            response,
            origin_ttl,
            expires_at: now + Duration::from_secs(u64::from(origin_ttl)),
            hits: AtomicU64::new(0),
            refresh_scheduled: AtomicBool::new(false),
        }
    }

    pub fn origin_ttl(&self) -> u32 {
        self.origin_ttl
    }

    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Whole seconds left, never above the origin TTL.
    pub fn remaining_ttl(&self, now: Instant) -> u32 {
        let left = self.expires_at.saturating_duration_since(now).as_secs();
        left.min(u64::from(self.origin_ttl)) as u32
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// How long ago the entry expired; zero while fresh.
    pub fn stale_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.expires_at)
    }

    /// Counts a hit and returns the new total.
    pub fn record_hit(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Sets the refresh flag; true only for the caller that set it.
    pub fn try_schedule_refresh(&self) -> bool {
        !self.refresh_scheduled.swap(true, Ordering::AcqRel)
    }

    /// Copy of the response with every record TTL set to `ttl`.
    pub fn response_with_ttl(&self, ttl: u32) -> DnsResponse {
        let mut response = self.response.clone();
        response.set_ttls(ttl);
        response
    }
}
