use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::future::Future;
use std::sync::Arc;
use strata_dns_domain::DomainError;
use tokio::sync::watch;

use super::key::CacheKey;

type FlightResult<T> = Result<T, DomainError>;
type FlightSender<T> = Arc<watch::Sender<Option<FlightResult<T>>>>;
type Registry<T> = Arc<DashMap<CacheKey, FlightSender<T>, FxBuildHasher>>;

/// Result of [`SingleFlight::fetch_or_join`].
#[derive(Debug)]
pub struct Flight<T> {
    pub result: FlightResult<T>,
    leader: bool,
}

impl<T> Flight<T> {
    /// True when this caller started the fetch rather than joining one.
    pub fn is_leader(&self) -> bool {
        self.leader
    }
}

/// Clears the registry slot if the fetch task ends without publishing.
/// Dropping the sender wakes every waiter with `FetchAborted`.
struct InflightLeaderGuard<T> {
    inflight: Registry<T>,
    key: CacheKey,
    tx: Option<FlightSender<T>>,
}

impl<T> InflightLeaderGuard<T> {
    fn publish(mut self, result: FlightResult<T>) {
        if let Some(tx) = self.tx.take() {
            self.inflight
                .remove_if(&self.key, |_, current| Arc::ptr_eq(current, &tx));
            tx.send_replace(Some(result));
        }
    }
}

impl<T> Drop for InflightLeaderGuard<T> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            self.inflight
                .remove_if(&self.key, |_, current| Arc::ptr_eq(current, &tx));
        }
    }
}

/// At most one outstanding fetch per key; everyone else waits on its result.
///
/// Fetches run in their own task, so a waiter that goes away never cancels
/// the work the others are waiting on.
pub struct SingleFlight<T> {
    inflight: Registry<T>,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    /// Starts `fetch` unless one is already running for `key`, then waits
    /// for whichever fetch owns the key.
    pub async fn fetch_or_join<F>(&self, key: CacheKey, fetch: F) -> Flight<T>
    where
        F: Future<Output = FlightResult<T>> + Send + 'static,
    {
        let (leader, rx) = match self.inflight.entry(key) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                (false, rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                self.spawn_fetch(key, tx, fetch);
                (true, rx)
            }
        };

        Flight {
            result: Self::wait(rx).await,
            leader,
        }
    }

    /// Starts `fetch` in the background. Returns false, and drops `fetch`,
    /// when a fetch for `key` is already running.
    pub fn spawn_detached<F>(&self, key: CacheKey, fetch: F) -> bool
    where
        F: Future<Output = FlightResult<T>> + Send + 'static,
    {
        match self.inflight.entry(key) {
            dashmap::Entry::Occupied(_) => false,
            dashmap::Entry::Vacant(e) => {
                let (tx, _rx) = watch::channel(None);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                self.spawn_fetch(key, tx, fetch);
                true
            }
        }
    }

    /// Number of keys with a fetch outstanding.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.inflight.contains_key(key)
    }

    fn spawn_fetch<F>(&self, key: CacheKey, tx: FlightSender<T>, fetch: F)
    where
        F: Future<Output = FlightResult<T>> + Send + 'static,
    {
        let guard = InflightLeaderGuard {
            inflight: Arc::clone(&self.inflight),
            key,
            tx: Some(tx),
        };
        tokio::spawn(async move {
            let result = fetch.await;
            guard.publish(result);
        });
    }

    async fn wait(mut rx: watch::Receiver<Option<FlightResult<T>>>) -> FlightResult<T> {
        match rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone().unwrap_or(Err(DomainError::FetchAborted)),
            Err(_) => Err(DomainError::FetchAborted),
        }
    }
}
