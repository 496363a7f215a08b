//! Refreshing randomized-sampling cache over the public character list.
//!
//! Two values are cached with independent lifetimes: the full public
//! character list (short, refresh-scale TTL) and the derived
//! "characters of the day" selection (daily-scale TTL). Each lives in a
//! [`TtlCell`] implementing the freshness policy:
//!
//! - empty cell: the first caller starts the load; concurrent callers
//!   share that single in-flight load and observe the same value or the
//!   same failure;
//! - fresh cell: reads return the cached value;
//! - stale cell: reads return the stale value immediately and at most one
//!   background refresh runs until a new value supersedes the old one.
//!
//! Values are replaced wholesale under the cell lock, never mutated in
//! place. A failed refresh keeps the previous value.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use mockable::Clock;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::ports::{CharacterRepository, CharacterSampling, CharacterStoreError};
use crate::domain::Error;

/// Tunables for the sampling cache. Values come from configuration, not
/// call sites.
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    /// Time a cached public list stays fresh.
    pub public_list_ttl: Duration,
    /// Time a cached of-the-day selection stays fresh.
    pub of_the_day_ttl: Duration,
    /// Sample size used when the caller does not pass one.
    pub default_sample_size: usize,
    /// Hard cap applied to any requested sample size.
    pub max_sample_size: usize,
    /// Number of names selected for "characters of the day".
    pub of_the_day_count: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            public_list_ttl: Duration::minutes(5),
            of_the_day_ttl: Duration::hours(24),
            default_sample_size: 1,
            max_sample_size: 10,
            of_the_day_count: 1,
        }
    }
}

type SharedLoad<T> = Shared<BoxFuture<'static, Result<T, Error>>>;

struct TtlEntry<T> {
    value: T,
    computed_at: DateTime<Utc>,
}

struct CellState<T> {
    current: Option<TtlEntry<T>>,
    in_flight: Option<SharedLoad<T>>,
}

/// One cached value with freshness tracking and single-flight loads.
struct TtlCell<T> {
    ttl: Duration,
    state: Mutex<CellState<T>>,
}

impl<T> TtlCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CellState {
                current: None,
                in_flight: None,
            }),
        }
    }

    /// Return the cached value, loading or refreshing per the freshness
    /// policy. `load` is only invoked when this call starts a load itself.
    async fn get_or_load<F>(
        cell: &Arc<Self>,
        clock: &Arc<dyn Clock>,
        load: F,
    ) -> Result<T, Error>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, Error>>,
    {
        let now = clock.utc();
        let pending = {
            let mut guard = cell.state.lock().await;
            let state = &mut *guard;
            match state.current.as_ref() {
                Some(entry) if now.signed_duration_since(entry.computed_at) < cell.ttl => {
                    return Ok(entry.value.clone());
                }
                Some(entry) => {
                    // Stale: serve the old value now, refresh at most once
                    // in the background.
                    if state.in_flight.is_none() {
                        let shared = load().shared();
                        state.in_flight = Some(shared.clone());
                        Self::spawn_commit(Arc::clone(cell), shared, Arc::clone(clock));
                    }
                    return Ok(entry.value.clone());
                }
                None => match state.in_flight.clone() {
                    Some(shared) => shared,
                    None => {
                        let shared = load().shared();
                        state.in_flight = Some(shared.clone());
                        Self::spawn_commit(Arc::clone(cell), shared.clone(), Arc::clone(clock));
                        shared
                    }
                },
            }
        };

        // Empty cell: every waiter shares the single in-flight load.
        pending.await
    }

    /// Await the shared load off the caller's path and publish its result.
    fn spawn_commit(cell: Arc<Self>, pending: SharedLoad<T>, clock: Arc<dyn Clock>) {
        tokio::spawn(async move {
            let result = pending.await;
            let mut state = cell.state.lock().await;
            state.in_flight = None;
            match result {
                Ok(value) => {
                    state.current = Some(TtlEntry {
                        value,
                        computed_at: clock.utc(),
                    });
                }
                Err(error) => {
                    warn!(error = %error, "cache load failed, keeping previous value");
                }
            }
        });
    }
}

/// Randomized sampling service backed by two independently refreshed
/// cache cells over the record store's public character list.
pub struct SamplingCache<R> {
    records: Arc<R>,
    clock: Arc<dyn Clock>,
    config: SamplingConfig,
    public_list: Arc<TtlCell<Vec<String>>>,
    of_the_day: Arc<TtlCell<Vec<String>>>,
}

impl<R> SamplingCache<R>
where
    R: CharacterRepository + 'static,
{
    /// Create a cache over the given record store.
    pub fn new(records: Arc<R>, clock: Arc<dyn Clock>, config: SamplingConfig) -> Self {
        let public_list = Arc::new(TtlCell::new(config.public_list_ttl));
        let of_the_day = Arc::new(TtlCell::new(config.of_the_day_ttl));
        Self {
            records,
            clock,
            config,
            public_list,
            of_the_day,
        }
    }

    async fn public_names(&self) -> Result<Vec<String>, Error> {
        let records = Arc::clone(&self.records);
        TtlCell::get_or_load(&self.public_list, &self.clock, move || {
            load_public_list(records)
        })
        .await
    }
}

fn load_public_list<R>(records: Arc<R>) -> BoxFuture<'static, Result<Vec<String>, Error>>
where
    R: CharacterRepository + 'static,
{
    async move { records.list_public().await.map_err(map_store_error) }.boxed()
}

fn map_store_error(error: CharacterStoreError) -> Error {
    match error {
        CharacterStoreError::Connection { message } => {
            Error::service_unavailable(format!("character store unavailable: {message}"))
        }
        CharacterStoreError::Query { message } => {
            Error::internal(format!("character store error: {message}"))
        }
    }
}

/// Draw up to `min(requested, cap)` distinct names without replacement.
fn sample_names(names: &[String], requested: usize, cap: usize) -> Vec<String> {
    if names.is_empty() {
        return Vec::new();
    }
    let count = requested.min(cap);
    let mut rng = SmallRng::from_entropy();
    names.choose_multiple(&mut rng, count).cloned().collect()
}

#[async_trait]
impl<R> CharacterSampling for SamplingCache<R>
where
    R: CharacterRepository + 'static,
{
    async fn random(&self, n: Option<usize>) -> Result<Vec<String>, Error> {
        let names = self.public_names().await?;
        let requested = n.unwrap_or(self.config.default_sample_size);
        Ok(sample_names(&names, requested, self.config.max_sample_size))
    }

    async fn characters_of_the_day(&self) -> Result<Vec<String>, Error> {
        let records = Arc::clone(&self.records);
        let public_list = Arc::clone(&self.public_list);
        let clock = Arc::clone(&self.clock);
        let count = self.config.of_the_day_count;
        let cap = self.config.max_sample_size;
        TtlCell::get_or_load(&self.of_the_day, &self.clock, move || {
            async move {
                let names =
                    TtlCell::get_or_load(&public_list, &clock, move || load_public_list(records))
                        .await?;
                Ok(sample_names(&names, count, cap))
            }
            .boxed()
        })
        .await
    }
}

#[cfg(test)]
#[path = "sampling_cache_tests.rs"]
mod tests;
