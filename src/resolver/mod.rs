//! Fan-out/fan-in resolution of references against a `RemoteSource`.
//!
//! Every remote call goes through one shared semaphore, so the number of
//! concurrent fetches is capped by `CatalogConfig::max_concurrency` no matter
//! how many references a batch holds. Batches return results in input order.

mod catalog;
mod evolution;
mod moves;
pub mod outcome;

pub use outcome::{CatalogLoad, EvolutionTree, ItemOutcome, PartialResult, ResolutionFailure};

use crate::cache::ResolutionCache;
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult};
use crate::normalize::normalize_pokemon;
use crate::source::RemoteSource;
use schema::{ChainLink, Entity, MoveDetail, SpeciesSummary};
use serde_json::Value;
use std::future::{self, Future};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// The caches a resolver reads through. Construct one per catalog (or per test)
/// and hand it to the resolver; clones share entries.
#[derive(Clone)]
pub struct CatalogCaches {
    pub entities: ResolutionCache<u32, Entity>,
    pub moves: ResolutionCache<String, MoveDetail>,
    pub species: ResolutionCache<u32, SpeciesSummary>,
    pub chains: ResolutionCache<u32, ChainLink>,
}

impl CatalogCaches {
    pub fn new() -> Self {
        Self {
            entities: ResolutionCache::new("entities"),
            moves: ResolutionCache::new("moves"),
            species: ResolutionCache::new("species"),
            chains: ResolutionCache::new("chains"),
        }
    }
}

impl Default for CatalogCaches {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FanoutResolver<S> {
    source: Arc<S>,
    config: Arc<CatalogConfig>,
    permits: Arc<Semaphore>,
    caches: CatalogCaches,
}

impl<S> Clone for FanoutResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: Arc::clone(&self.config),
            permits: Arc::clone(&self.permits),
            caches: self.caches.clone(),
        }
    }
}

impl<S> FanoutResolver<S> {
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn caches(&self) -> &CatalogCaches {
        &self.caches
    }
}

impl<S: RemoteSource> FanoutResolver<S> {
    pub fn new(source: Arc<S>, config: CatalogConfig, caches: CatalogCaches) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self {
            source,
            config: Arc::new(config),
            permits,
            caches,
        }
    }

    /// Fetch `url` under a concurrency permit and normalize the payload.
    ///
    /// The returned future owns everything it needs, so it can run on a
    /// spawned task that outlives the caller.
    fn fetch_normalized<T>(
        &self,
        url: String,
        normalize: fn(&Value) -> CatalogResult<T>,
    ) -> impl Future<Output = CatalogResult<T>> + Send + 'static
    where
        T: Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let permits = Arc::clone(&self.permits);
        async move {
            let payload = {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| CatalogError::unavailable(url.as_str(), "resolver shut down"))?;
                source.fetch(&url).await?
            };
            normalize(&payload).map_err(|e| e.with_resource(&url))
        }
    }

    /// Resolve one species record by id through the entity cache.
    pub async fn resolve_entity(&self, id: u32) -> CatalogResult<Entity> {
        let url = self.config.pokemon_url(id);
        self.resolve_entity_at(id, url).await
    }

    /// Resolve one species record by name.
    ///
    /// The entity cache is keyed by id, which a name does not reveal, so an
    /// already cached entity is found by scanning. Otherwise the record is
    /// fetched from the name endpoint and stored under its id, where later id
    /// lookups find it.
    pub async fn resolve_entity_by_name(&self, name: &str) -> CatalogResult<Entity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::not_found("pokemon/"));
        }
        if let Some(entity) = self
            .caches
            .entities
            .find(|entity| entity.name.eq_ignore_ascii_case(name))
        {
            debug!(name, id = entity.id, "entity found by name in cache");
            return Ok(entity);
        }

        let entity = self
            .fetch_normalized(self.config.pokemon_url_by_name(name), normalize_pokemon)
            .await?;
        self.caches
            .entities
            .get_or_resolve(entity.id, || future::ready(Ok(entity)))
            .await
    }

    /// Resolve the entity `id` whose detail lives at `url`. The payload must
    /// carry the same id, otherwise the cache key would lie.
    async fn resolve_entity_at(&self, id: u32, url: String) -> CatalogResult<Entity> {
        self.caches
            .entities
            .get_or_resolve(id, || {
                let fetch = self.fetch_normalized(url.clone(), normalize_pokemon);
                async move {
                    let entity = fetch.await?;
                    if entity.id != id {
                        return Err(CatalogError::malformed(
                            url,
                            format!("expected id {} but payload carries {}", id, entity.id),
                        ));
                    }
                    Ok(entity)
                }
            })
            .await
    }
}

/// Run `resolve` for every item concurrently and collect the results in input
/// order. Each item runs on its own task; abandoning the returned future does
/// not cancel items already started.
async fn fan_out<I, T, F, Fut>(items: Vec<I>, resolve: F) -> Vec<CatalogResult<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = CatalogResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = items
        .into_iter()
        .map(|item| tokio::spawn(resolve(item)))
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .unwrap_or_else(|e| Err(CatalogError::unavailable("fan-out task", e)));
        results.push(result);
    }
    results
}
