//! Resolution cache with at-most-one in-flight resolution per key.
//!
//! The first request for a key inserts a `Pending` entry and starts the
//! resolution on its own task. Later requests for the same key wait on that
//! task instead of resolving again, and all of them observe the same outcome.
//! Success is kept for the life of the cache; failure removes the entry so the
//! next request starts over.
//!
//! Because the resolution runs on a spawned task, a caller that stops waiting
//! (its future is dropped) does not cancel the fetch for anyone else.

use crate::errors::{CatalogError, CatalogResult};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

type Outcome<V> = Option<CatalogResult<V>>;

enum Entry<V> {
    Pending {
        generation: u64,
        receiver: watch::Receiver<Outcome<V>>,
    },
    Resolved(V),
}

struct Shared<K, V> {
    name: &'static str,
    entries: Mutex<HashMap<K, Entry<V>>>,
    next_generation: AtomicU64,
}

impl<K, V> Shared<K, V> {
    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Identifier -> value cache. Cloning is cheap and clones share entries.
pub struct ResolutionCache<K, V> {
    shared: Arc<Shared<K, V>>,
}

impl<K, V> Clone for ResolutionCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V> ResolutionCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// `name` only labels log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                entries: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Return the value for `key`, resolving it with `resolve` if nobody has yet.
    ///
    /// `resolve` is only called when no resolved value and no live in-flight
    /// resolution exist for `key`. Must be called from within a tokio runtime.
    pub async fn get_or_resolve<F, Fut>(&self, key: K, resolve: F) -> CatalogResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatalogResult<V>> + Send + 'static,
    {
        let mut receiver = {
            let mut entries = self.shared.entries();
            match entries.get(&key) {
                Some(Entry::Resolved(value)) => {
                    debug!(cache = self.shared.name, ?key, "cache hit");
                    return Ok(value.clone());
                }
                // A closed channel means the resolving task died without reporting
                Some(Entry::Pending { receiver, .. }) if receiver.has_changed().is_ok() => {
                    debug!(cache = self.shared.name, ?key, "joining in-flight resolution");
                    receiver.clone()
                }
                _ => {
                    let generation = self.shared.next_generation.fetch_add(1, Ordering::Relaxed);
                    let (sender, receiver) = watch::channel(None);
                    entries.insert(
                        key.clone(),
                        Entry::Pending {
                            generation,
                            receiver: receiver.clone(),
                        },
                    );
                    debug!(cache = self.shared.name, ?key, "starting resolution");
                    tokio::spawn(drive(
                        Arc::clone(&self.shared),
                        key,
                        generation,
                        resolve(),
                        sender,
                    ));
                    receiver
                }
            }
        };

        let outcome = match receiver.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| {
            Err(CatalogError::unavailable(
                self.shared.name,
                "resolution task ended without a result",
            ))
        })
    }

    /// The resolved value for `key`, if any. Never starts a resolution.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.shared.entries().get(key) {
            Some(Entry::Resolved(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Some resolved value matching `predicate`. Never starts a resolution.
    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.shared
            .entries()
            .values()
            .find_map(|entry| match entry {
                Entry::Resolved(value) if predicate(value) => Some(value.clone()),
                _ => None,
            })
    }

    pub fn contains(&self, key: &K) -> bool {
        matches!(self.shared.entries().get(key), Some(Entry::Resolved(_)))
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.shared
            .entries()
            .values()
            .filter(|entry| matches!(entry, Entry::Resolved(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_count(&self) -> usize {
        self.shared
            .entries()
            .values()
            .filter(|entry| matches!(entry, Entry::Pending { .. }))
            .count()
    }

    /// Drop every entry. In-flight resolutions still finish and notify their
    /// waiters, but their results are not stored.
    pub fn clear(&self) {
        self.shared.entries().clear();
    }
}

/// Run one resolution to completion, record it, then wake every waiter.
async fn drive<K, V, Fut>(
    shared: Arc<Shared<K, V>>,
    key: K,
    generation: u64,
    resolution: Fut,
    sender: watch::Sender<Outcome<V>>,
) where
    K: Eq + Hash + Debug,
    V: Clone,
    Fut: Future<Output = CatalogResult<V>>,
{
    let result = resolution.await;
    {
        let mut entries = shared.entries();
        let still_ours = matches!(
            entries.get(&key),
            Some(Entry::Pending { generation: g, .. }) if *g == generation
        );
        if still_ours {
            match &result {
                Ok(value) => {
                    entries.insert(key, Entry::Resolved(value.clone()));
                }
                Err(error) => {
                    warn!(cache = shared.name, ?key, %error, "resolution failed; entry released");
                    entries.remove(&key);
                }
            }
        }
    }
    sender.send_replace(Some(result));
}
