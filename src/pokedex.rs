//! The presentation-facing entry point.

use crate::config::CatalogConfig;
use crate::errors::CatalogResult;
use crate::query::{self, CatalogFilter, CatalogPage, PageRequest};
use crate::resolver::{CatalogCaches, CatalogLoad, EvolutionTree, FanoutResolver, PartialResult};
use crate::source::{HttpSource, RemoteSource};
use schema::{Entity, MoveDetail};
use std::fmt;
use std::sync::Arc;

/// A catalog bound to one remote source and one set of caches.
///
/// Cloning is cheap; clones share the source, the caches and the concurrency cap.
pub struct Pokedex<S> {
    resolver: FanoutResolver<S>,
}

impl<S> Clone for Pokedex<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<S> fmt::Debug for Pokedex<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pokedex")
            .field("base_url", &self.resolver.config().base_url)
            .field("cached_entities", &self.resolver.caches().entities.len())
            .finish()
    }
}

impl Pokedex<HttpSource> {
    /// A catalog backed by the live HTTP API described by `config`.
    pub fn connect(config: CatalogConfig) -> CatalogResult<Self> {
        let source = HttpSource::new(&config)?;
        Ok(Self::new(source, config))
    }
}

impl<S> Pokedex<S> {
    pub fn resolver(&self) -> &FanoutResolver<S> {
        &self.resolver
    }

    pub fn config(&self) -> &CatalogConfig {
        self.resolver.config()
    }
}

impl<S: RemoteSource> Pokedex<S> {
    pub fn new(source: S, config: CatalogConfig) -> Self {
        Self::with_caches(Arc::new(source), config, CatalogCaches::new())
    }

    /// Share caches (and a source) with other catalogs, or inject fresh ones in tests.
    pub fn with_caches(source: Arc<S>, config: CatalogConfig, caches: CatalogCaches) -> Self {
        Self {
            resolver: FanoutResolver::new(source, config, caches),
        }
    }

    /// Resolve the whole species list. Species that fail are left out and listed
    /// in the returned failures.
    pub async fn load_catalog(&self) -> CatalogResult<CatalogLoad> {
        self.resolver.resolve_catalog().await
    }

    pub async fn resolve_entity(&self, id: u32) -> CatalogResult<Entity> {
        self.resolver.resolve_entity(id).await
    }

    pub async fn resolve_entity_by_name(&self, name: &str) -> CatalogResult<Entity> {
        self.resolver.resolve_entity_by_name(name).await
    }

    /// Resolve a species from either its Pokedex number or its name.
    pub async fn lookup(&self, species: &str) -> CatalogResult<Entity> {
        match species.trim().parse::<u32>() {
            Ok(id) => self.resolve_entity(id).await,
            Err(_) => self.resolve_entity_by_name(species).await,
        }
    }

    pub async fn resolve_moves(&self, entity: &Entity) -> PartialResult<MoveDetail> {
        self.resolver.resolve_moves(entity).await
    }

    pub async fn resolve_evolution_tree(&self, species_id: u32) -> CatalogResult<EvolutionTree> {
        self.resolver.resolve_evolution_tree(species_id).await
    }

    pub fn query_catalog<'a>(
        catalog: &'a [Entity],
        filter: &CatalogFilter,
        page: PageRequest,
    ) -> CatalogPage<'a> {
        query::query_catalog(catalog, filter, page)
    }
}
