// ABOUTME: Keyed cache of query results with in-flight request coalescing
// ABOUTME: Results are stored only when their request is still the current one for the key

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};
use storyloom_core::QueryKind;
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};
use crate::key::QueryKey;
use crate::query::Query;

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, QueryError>>>;

struct InFlight {
    id: u64,
    future: SharedFetch,
    /// Started before the key was invalidated; its result will not be stored
    superseded: bool,
}

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    updated_at: Option<Instant>,
    stale: bool,
    in_flight: Option<InFlight>,
}

impl Entry {
    fn invalidate(&mut self) {
        self.stale = true;
        if let Some(in_flight) = self.in_flight.as_mut() {
            in_flight.superseded = true;
        }
    }

    fn is_fresh(&self, stale_time: Option<Duration>) -> bool {
        if self.value.is_none() || self.stale {
            return false;
        }
        match (stale_time, self.updated_at) {
            (Some(limit), Some(updated_at)) => updated_at.elapsed() < limit,
            _ => true,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    next_fetch_id: AtomicU64,
    stale_time: Option<Duration>,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the outcome of fetch `id`, unless it was replaced or superseded meanwhile
    fn complete(&self, key: &QueryKey, id: u64, result: &Result<CachedValue, QueryError>) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            debug!("Dropping result for cleared key {}", key);
            return;
        };
        let Some(in_flight) = entry.in_flight.as_ref().filter(|f| f.id == id) else {
            debug!("Dropping result of replaced request for {}", key);
            return;
        };
        let superseded = in_flight.superseded;
        entry.in_flight = None;
        if superseded {
            debug!("Dropping superseded result for {}", key);
            return;
        }
        match result {
            Ok(value) => {
                entry.value = Some(Arc::clone(value));
                entry.updated_at = Some(Instant::now());
                entry.stale = false;
            }
            Err(err) => debug!("Fetch for {} failed: {}", key, err),
        }
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: CachedValue) -> QueryResult<Arc<T>> {
    value
        .downcast::<T>()
        .map_err(|_| QueryError::TypeMismatch(key.to_string()))
}

/// Shared query cache. Clones share the same entries.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    /// Entries stay fresh until invalidated
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Entries also go stale `stale_time` after they were stored
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self::build(Some(stale_time))
    }

    fn build(stale_time: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_fetch_id: AtomicU64::new(1),
                stale_time,
            }),
        }
    }

    /// Start fetch for `query` and register it as the key's current request.
    ///
    /// A superseded request still outstanding for the key is awaited first, so
    /// a key never has two requests running against the backend.
    fn start<T: Send + Sync + 'static>(&self, entry: &mut Entry, query: &Query<T>) -> SharedFetch {
        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let key = query.key().clone();
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let query = query.clone();
        let previous = entry.in_flight.take().map(|in_flight| in_flight.future);
        debug!("Fetching {} (request {})", key, id);

        let future = async move {
            if let Some(previous) = previous {
                debug!("Waiting for superseded request on {}", key);
                let _ = previous.await;
            }
            let result = query
                .run()
                .await
                .map(|value| Arc::new(value) as CachedValue)
                .map_err(QueryError::from);
            if let Some(inner) = inner.upgrade() {
                inner.complete(&key, id, &result);
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            id,
            future: future.clone(),
            superseded: false,
        });
        future
    }

    /// Cached data when fresh, else join the key's outstanding request, else start one
    pub async fn fetch<T: Send + Sync + 'static>(&self, query: &Query<T>) -> QueryResult<Arc<T>> {
        let pending = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(query.key().clone()).or_default();
            if entry.is_fresh(self.inner.stale_time) {
                if let Some(value) = &entry.value {
                    return downcast(query.key(), Arc::clone(value));
                }
            }
            match &entry.in_flight {
                Some(in_flight) if !in_flight.superseded => {
                    debug!("Joining in-flight request for {}", query.key());
                    in_flight.future.clone()
                }
                _ => self.start(entry, query),
            }
        };

        let value = pending.await?;
        downcast(query.key(), value)
    }

    /// Start fetching in the background when the key is neither fresh nor loading
    pub fn prefetch<T: Send + Sync + 'static>(&self, query: &Query<T>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No runtime available to prefetch {}", query.key());
            return;
        };

        let pending = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(query.key().clone()).or_default();
            let loading = entry.in_flight.as_ref().is_some_and(|f| !f.superseded);
            if entry.is_fresh(self.inner.stale_time) || loading {
                return;
            }
            self.start(entry, query)
        };

        debug!("Prefetching {}", query.key());
        handle.spawn(async move {
            // The outcome is recorded by the fetch itself
            let _ = pending.await;
        });
    }

    /// Mark every entry of `kind` stale and supersede its in-flight requests
    pub fn invalidate(&self, kind: QueryKind) {
        let mut entries = self.inner.entries();
        let mut count = 0;
        entries.retain(|key, entry| {
            if key.kind != kind {
                return true;
            }
            count += 1;
            entry.invalidate();
            entry.value.is_some() || entry.in_flight.is_some()
        });
        debug!("Invalidated {} {} entries", count, kind);
    }

    pub fn invalidate_key(&self, key: &QueryKey) {
        if let Some(entry) = self.inner.entries().get_mut(key) {
            entry.invalidate();
        }
    }

    /// Store a value directly, replacing any in-flight request for the key
    pub fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut entries = self.inner.entries();
        let entry = entries.entry(key).or_default();
        entry.value = Some(Arc::new(value));
        entry.updated_at = Some(Instant::now());
        entry.stale = false;
        entry.in_flight = None;
    }

    /// Cached data for `key`, fresh or stale
    pub fn get_cached<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = self
            .inner
            .entries()
            .get(key)
            .and_then(|entry| entry.value.clone())?;
        downcast(key, value).ok()
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.inner
            .entries()
            .get(key)
            .map(|entry| entry.is_fresh(self.inner.stale_time))
            .unwrap_or(false)
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner
            .entries()
            .get(key)
            .map(|entry| entry.in_flight.is_some())
            .unwrap_or(false)
    }

    /// Drop every cached value. Outstanding requests are superseded and kept
    /// only until they finish, so a new fetch queues behind them.
    pub fn clear(&self) {
        self.inner.entries().retain(|_, entry| {
            entry.value = None;
            entry.updated_at = None;
            entry.invalidate();
            entry.in_flight.is_some()
        });
        debug!("Cleared query cache");
    }

    pub fn len(&self) -> usize {
        self.inner.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
