// In: src/lib.rs

//! Pokedex Catalog Resolution Layer
//!
//! Turns the per-item PokeAPI into a consistent, queryable in-memory catalog:
//! raw payloads are normalized into canonical records, nested references
//! (moves, evolution species) are resolved concurrently under a shared
//! concurrency cap, every resolved value is cached by its stable identifier,
//! and the resolved set can be filtered and paginated in memory.

// --- MODULE DECLARATIONS ---
pub mod cache;
pub mod config;
pub mod errors;
pub mod mcp_interface;
pub mod normalize;
pub mod pokedex;
pub mod query;
pub mod resolver;
pub mod source;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Re-export the canonical data model.
pub use schema::{
    BaseStats, ChainLink, Entity, EvolutionNode, ListPage, MoveDetail, MoveRef, ResourceRef,
    SpeciesSummary, StatName,
};

// --- From this crate's modules (`src/`) ---

// Entry point and configuration.
pub use config::CatalogConfig;
pub use pokedex::Pokedex;

// Resolution machinery.
pub use cache::ResolutionCache;
pub use resolver::{
    CatalogCaches, CatalogLoad, EvolutionTree, FanoutResolver, ItemOutcome, PartialResult,
    ResolutionFailure,
};
pub use source::{FixtureSource, HttpSource, RemoteSource};

// In-memory queries.
pub use query::{
    page_window, paginate, query_catalog, search_moves, AttackBucket, CatalogFilter, CatalogPage,
    PageMarker, PageRequest, WeightBucket,
};

// Crate-specific error and result types.
pub use errors::{CatalogError, CatalogResult, ConfigError, ConfigResult};
