use super::parse;
use crate::errors::CatalogResult;
use schema::{ChainLink, ResourceRef, SpeciesSummary};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RawSpecies {
    id: u32,
    name: String,
    #[serde(default)]
    evolution_chain: Option<RawUrl>,
}

#[derive(Deserialize)]
struct RawUrl {
    url: String,
}

#[derive(Deserialize)]
struct RawChain {
    chain: RawChainLink,
}

#[derive(Deserialize)]
struct RawChainLink {
    species: RawReference,
    #[serde(default)]
    evolves_to: Vec<RawChainLink>,
}

#[derive(Deserialize)]
struct RawReference {
    name: String,
    url: String,
}

impl From<RawChainLink> for ChainLink {
    fn from(raw: RawChainLink) -> Self {
        ChainLink {
            species: ResourceRef::new(raw.species.name, raw.species.url),
            evolves_to: raw.evolves_to.into_iter().map(ChainLink::from).collect(),
        }
    }
}

/// Species payload -> `SpeciesSummary`. A missing `evolution_chain` is not an error.
pub fn normalize_species(payload: &Value) -> CatalogResult<SpeciesSummary> {
    let raw: RawSpecies = parse(payload)?;
    Ok(SpeciesSummary {
        id: raw.id,
        name: raw.name,
        evolution_chain_url: raw.evolution_chain.map(|c| c.url),
    })
}

/// Evolution-chain payload -> the root `ChainLink`. Species ids are not
/// extracted here; they live in each link's URL.
pub fn normalize_chain(payload: &Value) -> CatalogResult<ChainLink> {
    let raw: RawChain = parse(payload)?;
    Ok(raw.chain.into())
}
