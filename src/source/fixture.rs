use super::RemoteSource;
use crate::errors::{CatalogError, CatalogResult};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

/// Scripted failure for one URL.
#[derive(Debug, Clone)]
struct FailurePlan {
    error: CatalogError,
    remaining: Option<usize>, // None fails forever
}

/// In-memory `RemoteSource` serving canned payloads.
///
/// Every call is counted per URL, failures can be scripted per URL, and an
/// optional random latency shuffles completion order. URLs are compared without
/// their trailing slash, so `.../pokemon/1` and `.../pokemon/1/` are the same
/// resource. Unknown URLs fail with `NotFound`.
#[derive(Debug, Default)]
pub struct FixtureSource {
    payloads: RwLock<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, FailurePlan>>,
    calls: Mutex<HashMap<String, usize>>,
    latency: Option<(Duration, Duration)>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` for `url`.
    pub fn with_payload(self, url: &str, payload: Value) -> Self {
        self.insert(url, payload);
        self
    }

    /// Every call sleeps for exactly `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some((latency, latency));
        self
    }

    /// Every call sleeps for a random duration up to `max`.
    pub fn with_jitter(mut self, max: Duration) -> Self {
        self.latency = Some((Duration::ZERO, max));
        self
    }

    pub fn insert(&self, url: &str, payload: Value) {
        self.payloads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(url), payload);
    }

    /// Fail the next `times` calls for `url` with `error`, then serve normally.
    pub fn fail_next(&self, url: &str, error: CatalogError, times: usize) {
        lock(&self.failures).insert(
            key(url),
            FailurePlan {
                error,
                remaining: Some(times),
            },
        );
    }

    /// Fail every call for `url` with `error`.
    pub fn fail_always(&self, url: &str, error: CatalogError) {
        lock(&self.failures).insert(
            key(url),
            FailurePlan {
                error,
                remaining: None,
            },
        );
    }

    pub fn call_count(&self, url: &str) -> usize {
        lock(&self.calls).get(&key(url)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_delay(&self) -> Option<Duration> {
        let (min, max) = self.latency?;
        if min >= max {
            return Some(min);
        }
        let millis = rand::rng().random_range(min.as_millis()..=max.as_millis());
        Some(Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX)))
    }

    fn scripted_failure(&self, url: &str) -> Option<CatalogError> {
        let mut failures = lock(&self.failures);
        let plan = failures.get_mut(url)?;
        let error = plan.error.clone();
        match plan.remaining.as_mut() {
            None => Some(error),
            Some(0) => {
                failures.remove(url);
                None
            }
            Some(remaining) => {
                *remaining -= 1;
                if *remaining == 0 {
                    failures.remove(url);
                }
                Some(error)
            }
        }
    }

    async fn serve(&self, url: &str) -> CatalogResult<Value> {
        let url = key(url);
        *lock(&self.calls).entry(url.clone()).or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.next_delay() {
            tokio::time::sleep(delay).await;
        }

        let result = match self.scripted_failure(&url) {
            Some(error) => Err(error),
            None => self
                .payloads
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&url)
                .cloned()
                .ok_or_else(|| CatalogError::not_found(url.clone())),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl RemoteSource for FixtureSource {
    fn fetch(&self, url: &str) -> impl Future<Output = CatalogResult<Value>> + Send {
        self.serve(url)
    }
}
