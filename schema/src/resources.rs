use serde::{Deserialize, Serialize};

/// A named pointer to a remote resource that has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

impl ResourceRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub count: u32,              // Total resources available upstream, not on this page
    pub next: Option<String>,    // Absolute URL of the following page, if any
    pub results: Vec<ResourceRef>,
}
