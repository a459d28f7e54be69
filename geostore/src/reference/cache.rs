//! TTL cache with request coalescing for reference datasets.
//!
//! Each dataset kind has its own slot. A missing or expired dataset is
//! fetched by exactly one caller; everyone arriving while that fetch is in
//! flight subscribes to its outcome instead of starting another one.
//!
//! ```text
//! countries() A ─┐
//!                │                           fetch_countries()
//! countries() B ─┼──► slot (miss) ──────────► provider
//!                │        │                        │
//! countries() C ─┘        ▼                        ▼
//!                   [A fetches, B and C      [one download]
//!                    wait on broadcast] ◄──────────┘
//! ```
//!
//! Failures are broadcast to the waiters of that flight but never cached. If
//! the fetching caller is cancelled (or its future dropped), the slot is
//! released and the remaining waiters retry, one of them becoming the new
//! fetcher.
//!
//! Invalidation bumps a per-slot generation and detaches any in-flight fetch.
//! A fetch started before the invalidation still answers its own callers but
//! its result is not cached; later callers start a fresh fetch.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::{FetchError, ReferenceError};
use super::features::{CityFeature, CountryFeature};
use super::provider::{DatasetKind, ReferenceProvider};

type Shared<T> = Arc<[T]>;
type FlightResult<T> = Result<Shared<T>, FetchError>;

/// A cached dataset and the moment it stops being served.
struct CacheEntry<T> {
    value: Shared<T>,
    /// `None` when the TTL is too large to represent
    expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// Cache state for one dataset kind.
struct Slot<T> {
    kind: DatasetKind,
    entry: RwLock<Option<CacheEntry<T>>>,
    in_flight: Mutex<Option<broadcast::Sender<FlightResult<T>>>>,
    /// Bumped on every invalidation
    generation: AtomicU64,
}

impl<T> Slot<T> {
    fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            entry: RwLock::new(None),
            in_flight: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    fn fresh(&self) -> Option<Shared<T>> {
        self.entry
            .read()
            .as_ref()
            .filter(|entry| entry.is_fresh())
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Cache `value` unless the slot was invalidated since `generation`.
    fn store(&self, generation: u64, value: Shared<T>, ttl: Duration) -> bool {
        let mut entry = self.entry.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *entry = Some(CacheEntry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        });
        true
    }

    fn clear(&self) {
        {
            let mut entry = self.entry.write();
            self.generation.fetch_add(1, Ordering::SeqCst);
            *entry = None;
        }
        *self.in_flight.lock() = None;
    }
}

/// What a caller does after observing a miss.
enum Role<'a, T> {
    Fetcher(InFlightGuard<'a, T>),
    Waiter(broadcast::Receiver<FlightResult<T>>),
}

/// Releases the in-flight slot when the fetcher finishes, fails, is
/// cancelled or is dropped mid-await.
struct InFlightGuard<'a, T> {
    slot: &'a Slot<T>,
    sender: broadcast::Sender<FlightResult<T>>,
    /// Slot generation when the fetch started
    generation: u64,
}

impl<T> InFlightGuard<'_, T> {
    /// Release the slot, then hand `result` to everyone who subscribed.
    fn finish(self, result: FlightResult<T>) {
        let sender = self.sender.clone();
        drop(self);

        let waiters = sender.receiver_count();
        let _ = sender.send(result);
        if waiters > 0 {
            debug!(waiters, "Broadcast dataset result to coalesced waiters");
        }
    }
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        let mut in_flight = self.slot.in_flight.lock();
        if in_flight
            .as_ref()
            .is_some_and(|current| current.same_channel(&self.sender))
        {
            *in_flight = None;
        }
    }
}

/// Statistics for monitoring cache effectiveness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Provider fetches started
    pub fetches: u64,
    /// Requests served from a fresh entry
    pub hits: u64,
    /// Requests that waited on another caller's fetch
    pub coalesced: u64,
    /// Fetches that returned an error
    pub failures: u64,
}

/// Caches reference datasets for a configurable time-to-live.
pub struct ReferenceCache<P> {
    provider: P,
    ttl: Duration,
    countries: Slot<CountryFeature>,
    cities: Slot<CityFeature>,
    fetches: AtomicU64,
    hits: AtomicU64,
    coalesced: AtomicU64,
    failures: AtomicU64,
}

impl<P: ReferenceProvider> ReferenceCache<P> {
    pub fn new(provider: P, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            countries: Slot::new(DatasetKind::Countries),
            cities: Slot::new(DatasetKind::Cities),
            fetches: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The countries dataset, fetching it if missing or expired.
    pub async fn countries(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Shared<CountryFeature>, ReferenceError> {
        self.load(&self.countries, cancel, || self.provider.fetch_countries())
            .await
    }

    /// The cities dataset, fetching it if missing or expired.
    pub async fn cities(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Shared<CityFeature>, ReferenceError> {
        self.load(&self.cities, cancel, || self.provider.fetch_cities())
            .await
    }

    /// Drop every cached dataset. The next request for each kind refetches.
    pub fn invalidate(&self) {
        self.countries.clear();
        self.cities.clear();
        info!("Reference cache invalidated");
    }

    /// Whether a fresh copy of `kind` is cached.
    pub fn is_cached(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::Countries => self.countries.fresh().is_some(),
            DatasetKind::Cities => self.cities.fresh().is_some(),
        }
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fetches: self.fetches.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    async fn load<T, F, Fut>(
        &self,
        slot: &Slot<T>,
        cancel: &CancellationToken,
        fetch: F,
    ) -> Result<Shared<T>, ReferenceError>
    where
        T: Send + Sync,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<T>, FetchError>>,
    {
        loop {
            if cancel.is_cancelled() {
                return Err(ReferenceError::Cancelled);
            }

            if let Some(value) = slot.fresh() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(dataset = %slot.kind, "Reference cache hit");
                return Ok(value);
            }

            let role = {
                let mut in_flight = slot.in_flight.lock();
                // A fetch may have completed between the check above and the lock
                if let Some(value) = slot.fresh() {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(value);
                }
                match in_flight.as_ref() {
                    Some(sender) => Role::Waiter(sender.subscribe()),
                    None => {
                        let (sender, _) = broadcast::channel(1);
                        *in_flight = Some(sender.clone());
                        Role::Fetcher(InFlightGuard {
                            slot,
                            sender,
                            generation: slot.generation.load(Ordering::SeqCst),
                        })
                    }
                }
            };

            match role {
                Role::Waiter(mut receiver) => {
                    self.coalesced.fetch_add(1, Ordering::Relaxed);
                    debug!(dataset = %slot.kind, "Waiting for in-flight dataset fetch");

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ReferenceError::Cancelled),
                        received = receiver.recv() => match received {
                            Ok(result) => return result.map_err(ReferenceError::from),
                            // Fetcher went away without a result; try again
                            Err(_) => continue,
                        },
                    }
                }
                Role::Fetcher(guard) => {
                    self.fetches.fetch_add(1, Ordering::Relaxed);
                    info!(dataset = %slot.kind, "Fetching reference dataset");
                    let started = Instant::now();

                    let fetched = tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!(dataset = %slot.kind, "Dataset fetch cancelled");
                            return Err(ReferenceError::Cancelled);
                        }
                        fetched = fetch() => fetched,
                    };

                    return match fetched {
                        Ok(items) => {
                            let value: Shared<T> = items.into();
                            let elapsed_ms = started.elapsed().as_millis() as u64;
                            if slot.store(guard.generation, Arc::clone(&value), self.ttl) {
                                info!(
                                    dataset = %slot.kind,
                                    features = value.len(),
                                    elapsed_ms,
                                    "Reference dataset cached"
                                );
                            } else {
                                debug!(
                                    dataset = %slot.kind,
                                    elapsed_ms,
                                    "Cache invalidated during fetch; result not cached"
                                );
                            }
                            guard.finish(Ok(Arc::clone(&value)));
                            Ok(value)
                        }
                        Err(e) => {
                            self.failures.fetch_add(1, Ordering::Relaxed);
                            warn!(
                                dataset = %slot.kind,
                                error = %e,
                                "Reference dataset fetch failed"
                            );
                            guard.finish(Err(e.clone()));
                            Err(e.into())
                        }
                    };
                }
            }
        }
    }
}
