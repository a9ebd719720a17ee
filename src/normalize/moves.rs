use super::parse;
use crate::errors::{CatalogError, CatalogResult};
use schema::MoveDetail;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RawMove {
    name: String,
    #[serde(rename = "type")]
    move_type: Named,
    #[serde(default)]
    power: Option<u32>,
    #[serde(default)]
    accuracy: Option<u32>,
    pp: u32,
    generation: Named,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

/// Upstream names generations `generation-<roman numeral>`; keep the numeral.
fn generation_label(generation: &str) -> CatalogResult<String> {
    match generation.split_once('-') {
        Some((_, numeral)) if !numeral.is_empty() => Ok(numeral.to_uppercase()),
        _ => Err(CatalogError::malformed(
            "",
            format!("unexpected generation name '{}'", generation),
        )),
    }
}

pub fn normalize_move(payload: &Value) -> CatalogResult<MoveDetail> {
    let raw: RawMove = parse(payload)?;
    Ok(MoveDetail {
        generation_label: generation_label(&raw.generation.name)?,
        name: raw.name,
        move_type: raw.move_type.name,
        power: raw.power,
        accuracy: raw.accuracy,
        pp: raw.pp,
    })
}
