use super::{fan_out, EvolutionTree, FanoutResolver, ResolutionFailure};
use crate::errors::{CatalogError, CatalogResult};
use crate::normalize::{id_from_url, normalize_chain, normalize_species};
use crate::source::RemoteSource;
use schema::{ChainLink, EvolutionNode, SpeciesSummary};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

/// A resolved subtree plus the failures pruned from beneath it.
type Expansion = (EvolutionNode, Vec<ResolutionFailure>);
type BoxedExpansion = Pin<Box<dyn Future<Output = CatalogResult<Expansion>> + Send>>;

impl<S: RemoteSource> FanoutResolver<S> {
    /// Resolve a species summary through the species cache.
    pub async fn resolve_species(&self, id: u32, url: String) -> CatalogResult<SpeciesSummary> {
        self.caches
            .species
            .get_or_resolve(id, || self.fetch_normalized(url, normalize_species))
            .await
    }

    /// Resolve a raw evolution chain through the chain cache (keyed by chain id).
    pub async fn resolve_chain(&self, url: &str) -> CatalogResult<ChainLink> {
        let id = id_from_url(url)?;
        self.caches
            .chains
            .get_or_resolve(id, || self.fetch_normalized(url.to_string(), normalize_chain))
            .await
    }

    /// Resolve the evolution tree containing `species_id`.
    ///
    /// The species and its chain are the root of the operation: if either fails
    /// the whole call fails. Below the root, siblings resolve concurrently and a
    /// failed subtree is pruned and recorded. A species that appears twice on one
    /// root-to-leaf path fails the whole call with `CycleDetected`.
    pub async fn resolve_evolution_tree(&self, species_id: u32) -> CatalogResult<EvolutionTree> {
        let species = self
            .resolve_species(species_id, self.config.species_url(species_id))
            .await?;

        let (root, failures) = match species.evolution_chain_url.as_deref() {
            Some(chain_url) => {
                let chain = self.resolve_chain(chain_url).await?;
                self.expand(chain, HashSet::new()).await?
            }
            // No chain upstream: the species is a tree of one
            None => (self.node_for(&species, Vec::new()), Vec::new()),
        };

        info!(
            species_id,
            nodes = root.node_count(),
            depth = root.depth(),
            failed = failures.len(),
            "evolution tree resolved"
        );
        Ok(EvolutionTree { root, failures })
    }

    fn node_for(&self, species: &SpeciesSummary, children: Vec<EvolutionNode>) -> EvolutionNode {
        EvolutionNode {
            id: species.id,
            name: species.name.clone(),
            image_url: self.config.artwork_url(species.id),
            children,
        }
    }

    /// Resolve `link` and, concurrently, each of its children.
    ///
    /// `visited` holds the species ids on the path from the root down to
    /// `link`'s parent. It is passed by value so sibling subtrees never share it.
    fn expand(&self, link: ChainLink, visited: HashSet<u32>) -> BoxedExpansion {
        let resolver = self.clone();
        Box::pin(async move {
            let id = id_from_url(&link.species.url)?;
            if visited.contains(&id) {
                return Err(CatalogError::CycleDetected { species_id: id });
            }
            let mut path = visited;
            path.insert(id);

            let species = resolver.resolve_species(id, link.species.url.clone()).await?;

            let child_names: Vec<String> = link
                .evolves_to
                .iter()
                .map(|child| child.species.name.clone())
                .collect();
            let results = fan_out(link.evolves_to, |child| resolver.expand(child, path.clone())).await;

            let mut children = Vec::with_capacity(results.len());
            let mut failures = Vec::new();
            for (reference, result) in child_names.into_iter().zip(results) {
                match result {
                    Ok((node, nested)) => {
                        children.push(node);
                        failures.extend(nested);
                    }
                    Err(error @ CatalogError::CycleDetected { .. }) => return Err(error),
                    Err(error) => {
                        warn!(%reference, %error, "evolution subtree pruned");
                        failures.push(ResolutionFailure { reference, error });
                    }
                }
            }

            Ok((resolver.node_for(&species, children), failures))
        })
    }
}
