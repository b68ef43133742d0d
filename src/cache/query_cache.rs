// src/cache/query_cache.rs
//
// Process-wide query cache
//
// ARCHITECTURE:
// - Type-erased slots keyed by QueryKey (downcast on access)
// - Concurrent reads of one key attach to one shared in-flight fetch
// - A read after invalidation never attaches to the outdated fetch; it
//   queues a fresh one behind it, keeping one request per key on the wire
// - Each fetch carries a ticket; only the fetch whose ticket is still
//   registered may settle the slot, so results started before `clear()`
//   are dropped
// - The map lock is never held across an await

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};

use super::entry::{CacheEntry, QueryStatus};
use super::key::{KeyPattern, QueryKey};
use super::with_deadline;
use crate::application::session::Session;
use crate::config::{StorefrontConfig, DEFAULT_READ_RETRIES, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{AppError, AppResult};
use crate::integrations::CatalogBackend;

type SharedFetch<T> = Shared<BoxFuture<'static, AppResult<T>>>;

/// Timeout and retry rules applied to reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub timeout: Duration,
    /// Automatic retries after a retryable read failure
    pub read_retries: u32,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            read_retries: DEFAULT_READ_RETRIES,
        }
    }
}

struct InFlight<T> {
    ticket: u64,
    fetch: SharedFetch<T>,
}

struct Slot<T> {
    value: Option<T>,
    error: Option<AppError>,
    status: QueryStatus,
    stale: bool,
    /// Invalidated while a fetch was running; the result is already outdated
    invalidated_in_flight: bool,
    in_flight: Option<InFlight<T>>,
}

/// Operations the cache needs without knowing a slot's value type
trait ErasedSlot: Send {
    fn mark_stale(&mut self);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Slot<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            value: None,
            error: None,
            status: QueryStatus::Idle,
            stale: false,
            invalidated_in_flight: false,
            in_flight: None,
        }
    }

    fn is_fresh(&self) -> bool {
        self.status == QueryStatus::Success && !self.stale
    }

    fn settle(&mut self, outcome: AppResult<T>) {
        self.in_flight = None;
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
                self.status = QueryStatus::Success;
                self.stale = self.invalidated_in_flight;
            }
            Err(AppError::NotReady) => {
                self.status = QueryStatus::NotReady;
                self.stale = true;
            }
            Err(error) => {
                self.error = Some(error);
                self.status = QueryStatus::Error;
            }
        }
        self.invalidated_in_flight = false;
    }

    fn snapshot(&self) -> CacheEntry<T> {
        CacheEntry {
            value: self.value.clone(),
            error: self.error.clone(),
            status: self.status,
            stale: self.stale,
        }
    }
}

impl<T> ErasedSlot for Slot<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn mark_stale(&mut self) {
        self.stale = true;
        if self.in_flight.is_some() {
            self.invalidated_in_flight = true;
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type SlotMap = HashMap<QueryKey, Box<dyn ErasedSlot>>;

fn slot_mut<'a, T>(slots: &'a mut SlotMap, key: &QueryKey) -> AppResult<&'a mut Slot<T>>
where
    T: Clone + Send + Sync + 'static,
{
    slots
        .entry(key.clone())
        .or_insert_with(|| Box::new(Slot::<T>::new()))
        .as_any_mut()
        .downcast_mut::<Slot<T>>()
        .ok_or_else(|| {
            AppError::Other(format!("cache key {} holds a different value type", key))
        })
}

pub struct QueryCache {
    session: Arc<Session>,
    policy: QueryPolicy,
    slots: Mutex<SlotMap>,
    next_ticket: AtomicU64,
}

impl QueryCache {
    pub fn new(session: Arc<Session>) -> Self {
        Self::with_policy(session, QueryPolicy::default())
    }

    pub fn with_policy(session: Arc<Session>, policy: QueryPolicy) -> Self {
        Self {
            session,
            policy,
            slots: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn from_config(session: Arc<Session>, config: &StorefrontConfig) -> Self {
        Self::with_policy(
            session,
            QueryPolicy {
                timeout: config.request_timeout,
                read_retries: config.read_retries,
            },
        )
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, SlotMap> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current entry for `key`, fetching only when it is missing, stale or
    /// failed. Concurrent callers for the same key share one fetch.
    pub async fn read<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> CacheEntry<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        self.read_inner(key, false, fetcher).await
    }

    /// Fetch again even if a fresh value is cached (explicit retry action).
    pub async fn refresh<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> CacheEntry<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        self.read_inner(key, true, fetcher).await
    }

    async fn read_inner<T, F, Fut>(&self, key: QueryKey, force: bool, fetcher: F) -> CacheEntry<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        if !self.session.is_connected() {
            let cached = self.peek::<T>(&key).and_then(|entry| entry.value);
            return CacheEntry::not_ready(cached);
        }

        let (ticket, fetch) = {
            let mut slots = self.lock();
            let slot = match slot_mut::<T>(&mut slots, &key) {
                Ok(slot) => slot,
                Err(error) => return CacheEntry::from_outcome(Err(error)),
            };

            let attached = slot
                .in_flight
                .as_ref()
                .map(|in_flight| (in_flight.ticket, in_flight.fetch.clone()));

            if let Some((ticket, previous)) = attached {
                if slot.invalidated_in_flight {
                    let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                    let fresh = self.start_fetch(key.clone(), fetcher);
                    let fetch = async move {
                        let _ = previous.await;
                        fresh.await
                    }
                    .boxed()
                    .shared();
                    slot.in_flight = Some(InFlight {
                        ticket,
                        fetch: fetch.clone(),
                    });
                    slot.invalidated_in_flight = false;
                    log::debug!("query {} refetching after invalidation (ticket {})", key, ticket);
                    (ticket, fetch)
                } else {
                    log::debug!("query {} attached to in-flight fetch", key);
                    (ticket, previous)
                }
            } else if !force && slot.is_fresh() {
                return slot.snapshot();
            } else {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                let fetch = self.start_fetch(key.clone(), fetcher);
                slot.in_flight = Some(InFlight {
                    ticket,
                    fetch: fetch.clone(),
                });
                slot.status = QueryStatus::Loading;
                log::debug!("query {} fetching (ticket {})", key, ticket);
                (ticket, fetch)
            }
        };

        let outcome = fetch.await;

        let mut slots = self.lock();
        if !slots.contains_key(&key) {
            // cleared while the fetch was running
            return CacheEntry::from_outcome(outcome);
        }
        let slot = match slot_mut::<T>(&mut slots, &key) {
            Ok(slot) => slot,
            Err(error) => return CacheEntry::from_outcome(Err(error)),
        };
        match slot.in_flight.as_ref().map(|in_flight| in_flight.ticket) {
            Some(current) if current == ticket => {
                slot.settle(outcome);
                slot.snapshot()
            }
            // a newer fetch replaced this one after an invalidation
            Some(_) => {
                let mut entry = CacheEntry::from_outcome(outcome);
                entry.stale = true;
                entry
            }
            // another caller attached to the same fetch already settled it
            None if slot.status != QueryStatus::Loading => slot.snapshot(),
            None => CacheEntry::from_outcome(outcome),
        }
    }

    /// `read` whose fetcher talks to the session's live backend.
    pub async fn read_remote<T, F, Fut>(&self, key: QueryKey, call: F) -> CacheEntry<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(Arc<dyn CatalogBackend>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let session = Arc::clone(&self.session);
        self.read(key, move || {
            let pending = session.backend().map(&call);
            async move { pending?.await }
        })
        .await
    }

    /// `write` against the session's live backend; NotReady when unconnected.
    pub async fn write_remote<T, F, Fut>(
        &self,
        mutation: &str,
        invalidates: &[KeyPattern],
        call: F,
    ) -> AppResult<T>
    where
        F: FnOnce(Arc<dyn CatalogBackend>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let backend = self.session.backend()?;
        self.write(mutation, invalidates, call(backend)).await
    }

    fn start_fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> SharedFetch<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let policy = self.policy;
        async move {
            let mut attempt = 0;
            loop {
                match with_deadline(policy.timeout, fetcher()).await {
                    Err(error) if attempt < policy.read_retries && error.is_retryable() => {
                        attempt += 1;
                        log::warn!(
                            "query {} failed ({}), retry {}/{}",
                            key,
                            error,
                            attempt,
                            policy.read_retries
                        );
                    }
                    Err(error) => {
                        if !error.is_not_ready() {
                            log::warn!("query {} failed: {}", key, error);
                        }
                        return Err(error);
                    }
                    Ok(value) => return Ok(value),
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Cached entry without fetching. `None` if absent or of another type.
    pub fn peek<T>(&self, key: &QueryKey) -> Option<CacheEntry<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut slots = self.lock();
        slots
            .get_mut(key)?
            .as_any_mut()
            .downcast_mut::<Slot<T>>()
            .map(|slot| slot.snapshot())
    }

    /// Run a state-changing remote call. Only on success are the given
    /// patterns invalidated; failures are returned untouched.
    pub async fn write<T, Fut>(
        &self,
        mutation: &str,
        invalidates: &[KeyPattern],
        mutator: Fut,
    ) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        match with_deadline(self.policy.timeout, mutator).await {
            Ok(value) => {
                let stale: usize = invalidates.iter().map(|p| self.invalidate(p)).sum();
                log::info!("{} succeeded, {} cached queries marked stale", mutation, stale);
                Ok(value)
            }
            Err(error) => {
                log::warn!("{} failed: {}", mutation, error);
                Err(error)
            }
        }
    }

    /// Mark every matching entry stale. Returns how many matched.
    pub fn invalidate(&self, pattern: &KeyPattern) -> usize {
        let mut slots = self.lock();
        let mut count = 0;
        for (key, slot) in slots.iter_mut() {
            if pattern.matches(key) {
                slot.mark_stale();
                count += 1;
            }
        }
        count
    }

    /// Drop every entry (logout / session teardown).
    pub fn clear(&self) {
        let mut slots = self.lock();
        let dropped = slots.len();
        slots.clear();
        log::info!("query cache cleared ({} entries)", dropped);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
