//! In-memory query cache with a freshness window and an eviction window.
//!
//! An entry younger than `stale_after` is served without touching the
//! network. Older entries are refetched, and the old value is kept as a
//! fallback when the refetch fails. An entry nobody has asked for within
//! `evict_after` is dropped entirely.

use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};

/// Data is served from cache without a refetch for this long.
pub const STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// Entries unused for this long are evicted.
pub const EVICT_AFTER: Duration = Duration::from_secs(10 * 60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: Instant,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: Instant, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

/// What a caller can observe about a single query.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    /// Nothing cached and nothing requested yet.
    Idle,
    Loading,
    Loaded(T),
    Errored(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

struct Entry<T> {
    value: Option<Cached<T>>,
    error: Option<String>,
    /// Held for the duration of a fetch. Dropping the guard, including by
    /// cancelling the fetching future, ends the in-flight period.
    fetch_lock: Arc<Mutex<()>>,
    last_used: Instant,
}

impl<T> Entry<T> {
    fn new(now: Instant) -> Self {
        Self {
            value: None,
            error: None,
            fetch_lock: Arc::new(Mutex::new(())),
            last_used: now,
        }
    }

    fn in_flight(&self) -> bool {
        self.fetch_lock.try_lock().is_err()
    }
}

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Cached<T> {
    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        (self.fetched_at.elapsed() < ttl).then(|| {
            CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Cached)
        })
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

pub struct QueryCache<K, T> {
    entries: Arc<Mutex<HashMap<K, Entry<T>>>>,
    stale_after: Duration,
    evict_after: Duration,
}

impl<K, T> Clone for QueryCache<K, T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stale_after: self.stale_after,
            evict_after: self.evict_after,
        }
    }
}

impl<K, T> Default for QueryCache<K, T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    T: Clone,
{
    fn default() -> Self {
        Self::new(STALE_AFTER, EVICT_AFTER)
    }
}

impl<K, T> QueryCache<K, T>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    T: Clone,
{
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
            evict_after,
        }
    }

    /// Serves `key` from cache while fresh, otherwise runs `fetch` once.
    ///
    /// Concurrent callers for the same key queue behind a single fetch and
    /// are served its result from cache. The map lock is released while
    /// `fetch` runs.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<CachedPayload<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let fetch_lock = {
            let mut entries = self.entries.lock().await;
            self.evict_unused(&mut entries);
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(Instant::now()));
            entry.last_used = Instant::now();
            if let Some(payload) = self.fresh(entry) {
                tracing::debug!(?key, "serving cached query");
                return Ok(payload);
            }
            Arc::clone(&entry.fetch_lock)
        };

        let _fetching = fetch_lock.lock_owned().await;

        // Another caller may have refreshed the entry while we queued.
        {
            let entries = self.entries.lock().await;
            if let Some(payload) = entries.get(&key).and_then(|entry| self.fresh(entry)) {
                tracing::debug!(?key, "joined in-flight query");
                return Ok(payload);
            }
        }

        let outcome = fetch().await;

        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_used = now;

        match outcome {
            Ok(data) => {
                entry.error = None;
                entry.value = Some(Cached {
                    value: data.clone(),
                    fetched_at: now,
                });
                Ok(CachedPayload::new(data, now, CacheStatus::Fresh))
            }
            Err(error) => {
                entry.error = Some(error.to_string());
                match entry.value.as_ref() {
                    Some(cached) => {
                        tracing::warn!(?key, %error, "refetch failed; serving stale data");
                        Ok(cached.stale())
                    }
                    None => Err(error),
                }
            }
        }
    }

    fn fresh(&self, entry: &Entry<T>) -> Option<CachedPayload<T>> {
        entry
            .value
            .as_ref()
            .and_then(|cached| cached.if_fresh(self.stale_after))
    }

    pub async fn state(&self, key: &K) -> QueryState<T> {
        let mut entries = self.entries.lock().await;
        self.evict_unused(&mut entries);
        match entries.get(key) {
            None => QueryState::Idle,
            Some(entry) => match (&entry.value, &entry.error) {
                (Some(cached), _) => QueryState::Loaded(cached.value.clone()),
                (None, _) if entry.in_flight() => QueryState::Loading,
                (None, Some(error)) => QueryState::Errored(error.clone()),
                (None, None) => QueryState::Idle,
            },
        }
    }

    fn evict_unused(&self, entries: &mut HashMap<K, Entry<T>>) {
        let evict_after = self.evict_after;
        entries.retain(|key, entry| {
            let keep = entry.in_flight() || entry.last_used.elapsed() < evict_after;
            if !keep {
                tracing::debug!(?key, "evicting unused query");
            }
            keep
        });
    }
}
