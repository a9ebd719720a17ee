//! Normalizers: one pure function per raw payload shape.
//!
//! Each normalizer reads only the documented fields and ignores everything else.
//! Optional fields that are absent become `None`. A payload that does not match
//! the expected shape fails with `MalformedPayload` carrying an empty resource;
//! callers that know the URL fill it in.

mod evolution;
mod list;
mod moves;
mod pokemon;

pub use evolution::{normalize_chain, normalize_species};
pub use list::normalize_list_page;
pub use moves::normalize_move;
pub use pokemon::normalize_pokemon;

use crate::errors::{CatalogError, CatalogResult};
use serde::Deserialize;
use serde_json::Value;

/// Deserialize `payload` into a raw shape, mapping shape errors to `MalformedPayload`.
pub(crate) fn parse<'a, T: Deserialize<'a>>(payload: &'a Value) -> CatalogResult<T> {
    T::deserialize(payload).map_err(|e| CatalogError::malformed("", e))
}

/// Extract the trailing numeric path segment of a reference URL.
///
/// `https://pokeapi.co/api/v2/pokemon-species/133/` yields `133`.
pub fn id_from_url(url: &str) -> CatalogResult<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u32>().ok())
        .ok_or_else(|| CatalogError::malformed(url, "no numeric id in trailing path segment"))
}
