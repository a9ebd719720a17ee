use super::parse;
use crate::errors::{CatalogError, CatalogResult};
use schema::{BaseStats, Entity, MoveRef, StatName};
use serde::Deserialize;
use serde_json::Value;
use strum::IntoEnumIterator;

#[derive(Deserialize)]
struct RawPokemon {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<RawTypeSlot>,
    stats: Vec<RawStat>,
    #[serde(default)]
    moves: Vec<RawMoveSlot>,
    #[serde(default)]
    sprites: Option<RawSprites>,
}

#[derive(Deserialize)]
struct RawTypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    type_: RawReference,
}

#[derive(Deserialize)]
struct RawStat {
    base_stat: u32,
    stat: RawReference,
}

#[derive(Deserialize)]
struct RawMoveSlot {
    #[serde(rename = "move")]
    move_: RawReference,
}

#[derive(Deserialize)]
struct RawReference {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize, Default)]
struct RawSprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    back_default: Option<String>,
    #[serde(default)]
    other: Option<RawOtherSprites>,
}

#[derive(Deserialize, Default)]
struct RawOtherSprites {
    #[serde(default, rename = "official-artwork")]
    official_artwork: Option<RawFrontSprite>,
    #[serde(default)]
    home: Option<RawFrontSprite>,
}

#[derive(Deserialize)]
struct RawFrontSprite {
    #[serde(default)]
    front_default: Option<String>,
}

fn base_stats(stats: &[RawStat]) -> CatalogResult<BaseStats> {
    let mut base = BaseStats::default();
    let mut seen = Vec::with_capacity(stats.len());

    for raw in stats {
        // Stats outside the canonical six are ignored
        if let Ok(stat) = raw.stat.name.parse::<StatName>() {
            base.set(stat, raw.base_stat);
            seen.push(stat);
        }
    }

    match StatName::iter().find(|stat| !seen.contains(stat)) {
        Some(missing) => Err(CatalogError::malformed(
            "",
            format!("missing base stat '{}'", missing),
        )),
        None => Ok(base),
    }
}

/// Artwork first, then the front, back and home sprites; absent ones are skipped.
fn image_urls(sprites: Option<RawSprites>) -> Vec<String> {
    let sprites = sprites.unwrap_or_default();
    let other = sprites.other.unwrap_or_default();
    let artwork = other.official_artwork.and_then(|s| s.front_default);
    let home = other.home.and_then(|s| s.front_default);

    [artwork, sprites.front_default, sprites.back_default, home]
        .into_iter()
        .flatten()
        .collect()
}

pub fn normalize_pokemon(payload: &Value) -> CatalogResult<Entity> {
    let raw: RawPokemon = parse(payload)?;

    let mut type_slots = raw.types;
    type_slots.sort_by_key(|t| t.slot);

    Ok(Entity {
        id: raw.id,
        name: raw.name,
        types: type_slots.into_iter().map(|t| t.type_.name).collect(),
        base_stats: base_stats(&raw.stats)?,
        height: raw.height,
        weight: raw.weight,
        move_refs: raw
            .moves
            .into_iter()
            .map(|m| MoveRef {
                name: m.move_.name,
                detail_url: m.move_.url,
            })
            .collect(),
        image_urls: image_urls(raw.sprites),
    })
}
