use super::parse;
use crate::errors::CatalogResult;
use schema::{ListPage, ResourceRef};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RawListPage {
    count: u32,
    #[serde(default)]
    next: Option<String>,
    results: Vec<RawReference>,
}

#[derive(Deserialize)]
struct RawReference {
    name: String,
    url: String,
}

/// `{ count, next, results: [{ name, url }] }` -> `ListPage`
pub fn normalize_list_page(payload: &Value) -> CatalogResult<ListPage> {
    let raw: RawListPage = parse(payload)?;
    Ok(ListPage {
        count: raw.count,
        next: raw.next,
        results: raw
            .results
            .into_iter()
            .map(|r| ResourceRef::new(r.name, r.url))
            .collect(),
    })
}
