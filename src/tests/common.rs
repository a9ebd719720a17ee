use crate::config::CatalogConfig;
use crate::errors::CatalogResult;
use crate::pokedex::Pokedex;
use crate::resolver::CatalogCaches;
use crate::source::FixtureSource;
use schema::{BaseStats, Entity, MoveRef, StatName};
use serde_json::{json, Value};
use std::sync::Arc;

pub const BASE_URL: &str = "https://pokeapi.test/api/v2";
pub const ARTWORK_URL: &str = "https://art.test/official-artwork";

/// Config pointing at the fixture host, with a small concurrency cap.
pub fn test_config() -> CatalogConfig {
    CatalogConfig {
        base_url: BASE_URL.to_string(),
        artwork_base_url: ARTWORK_URL.to_string(),
        max_concurrency: 8,
        ..CatalogConfig::default()
    }
}

pub fn pokemon_url(id: u32) -> String {
    format!("{}/pokemon/{}/", BASE_URL, id)
}

pub fn pokemon_name_url(name: &str) -> String {
    format!("{}/pokemon/{}/", BASE_URL, name)
}

pub fn move_url(name: &str) -> String {
    format!("{}/move/{}/", BASE_URL, name)
}

pub fn species_url(id: u32) -> String {
    format!("{}/pokemon-species/{}/", BASE_URL, id)
}

pub fn chain_url(id: u32) -> String {
    format!("{}/evolution-chain/{}/", BASE_URL, id)
}

/// A detail payload shaped like `/pokemon/{id}`, with only the fields the
/// normalizer reads plus a few it must ignore.
pub fn pokemon_payload(id: u32, name: &str, attack: u32, weight: u32, moves: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "base_experience": 64,
        "height": 7,
        "weight": weight,
        "order": id,
        "types": [
            { "slot": 1, "type": { "name": "grass", "url": format!("{}/type/12/", BASE_URL) } }
        ],
        "stats": [
            { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": attack, "effort": 0, "stat": { "name": "attack", "url": "" } },
            { "base_stat": 49, "effort": 0, "stat": { "name": "defense", "url": "" } },
            { "base_stat": 65, "effort": 1, "stat": { "name": "special-attack", "url": "" } },
            { "base_stat": 65, "effort": 0, "stat": { "name": "special-defense", "url": "" } },
            { "base_stat": 45, "effort": 0, "stat": { "name": "speed", "url": "" } }
        ],
        "moves": moves
            .iter()
            .map(|m| json!({ "move": { "name": m, "url": move_url(m) }, "version_group_details": [] }))
            .collect::<Vec<_>>(),
        "sprites": {
            "front_default": format!("https://sprites.test/{}.png", id),
            "back_default": null,
            "other": {
                "official-artwork": { "front_default": format!("https://art.test/{}.png", id) },
                "home": { "front_default": null }
            }
        }
    })
}

pub fn move_payload(name: &str, move_type: &str, power: Option<u32>, accuracy: Option<u32>) -> Value {
    json!({
        "id": 1,
        "name": name,
        "type": { "name": move_type, "url": "" },
        "power": power,
        "accuracy": accuracy,
        "pp": 25,
        "priority": 0,
        "generation": { "name": "generation-i", "url": "" }
    })
}

pub fn species_payload(id: u32, name: &str, chain_id: Option<u32>) -> Value {
    let chain = chain_id.map(|c| json!({ "url": chain_url(c) }));
    json!({
        "id": id,
        "name": name,
        "is_legendary": false,
        "evolution_chain": chain
    })
}

/// One chain link; `children` are other `link` values.
pub fn link(id: u32, name: &str, children: Vec<Value>) -> Value {
    json!({
        "is_baby": false,
        "species": { "name": name, "url": species_url(id) },
        "evolution_details": [],
        "evolves_to": children
    })
}

pub fn chain_payload(id: u32, root: Value) -> Value {
    json!({ "id": id, "baby_trigger_item": null, "chain": root })
}

pub fn list_payload(count: u32, entries: &[(u32, &str)], next: Option<String>) -> Value {
    json!({
        "count": count,
        "next": next,
        "previous": null,
        "results": entries
            .iter()
            .map(|(id, name)| json!({ "name": name, "url": pokemon_url(*id) }))
            .collect::<Vec<_>>()
    })
}

/// Register a species and its payload under the config's species URL.
pub fn add_species(source: &FixtureSource, id: u32, name: &str, chain_id: Option<u32>) {
    source.insert(&species_url(id), species_payload(id, name, chain_id));
}

/// A catalog over `source` with fresh caches. The source handle is returned so
/// tests can read call counts.
pub fn test_pokedex(source: FixtureSource) -> (Arc<FixtureSource>, Pokedex<FixtureSource>) {
    test_pokedex_with(source, test_config())
}

pub fn test_pokedex_with(
    source: FixtureSource,
    config: CatalogConfig,
) -> (Arc<FixtureSource>, Pokedex<FixtureSource>) {
    let source = Arc::new(source);
    let pokedex = Pokedex::with_caches(Arc::clone(&source), config, CatalogCaches::new());
    (source, pokedex)
}

/// A builder for in-memory entities used by query tests.
///
/// # Example
/// ```
/// let entity = TestEntityBuilder::new(6, "charizard")
///     .with_attack(84)
///     .with_weight(905)
///     .build();
/// ```
pub struct TestEntityBuilder {
    id: u32,
    name: String,
    attack: u32,
    weight: u32,
    types: Vec<String>,
    moves: Vec<String>,
}

impl TestEntityBuilder {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            attack: 50,
            weight: 100,
            types: vec!["normal".to_string()],
            moves: Vec::new(),
        }
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.attack = attack;
        self
    }

    /// Weight in hectograms, as the upstream catalog reports it.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn build(self) -> Entity {
        let mut base_stats = BaseStats::default();
        base_stats.set(StatName::Attack, self.attack);
        Entity {
            id: self.id,
            name: self.name,
            types: self.types,
            base_stats,
            height: 10,
            weight: self.weight,
            move_refs: self
                .moves
                .iter()
                .map(|m| MoveRef {
                    name: m.clone(),
                    detail_url: move_url(m),
                })
                .collect(),
            image_urls: Vec::new(),
        }
    }
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: CatalogResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
