use crate::errors::CatalogError;
use schema::{Entity, EvolutionNode};
use serde::Serialize;

/// A reference that could not be resolved, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionFailure {
    pub reference: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: CatalogError,
}

fn serialize_error<S: serde::Serializer>(error: &CatalogError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&error.to_string())
}

/// Per-item outcome inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T> {
    Resolved(T),
    Failed(ResolutionFailure),
}

impl<T> ItemOutcome<T> {
    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            ItemOutcome::Resolved(value) => Some(value),
            ItemOutcome::Failed(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&ResolutionFailure> {
        match self {
            ItemOutcome::Resolved(_) => None,
            ItemOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Ordered batch result mixing resolved values and per-item failures.
///
/// Position `i` always corresponds to input reference `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult<T> {
    items: Vec<ItemOutcome<T>>,
}

impl<T> PartialResult<T> {
    pub fn new(items: Vec<ItemOutcome<T>>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ItemOutcome<T>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ItemOutcome<T>> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn resolved(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(ItemOutcome::as_resolved)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResolutionFailure> {
        self.items.iter().filter_map(ItemOutcome::as_failure)
    }

    pub fn success_count(&self) -> usize {
        self.resolved().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// True when every reference resolved.
    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Result of resolving the full species list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogLoad {
    pub entities: Vec<Entity>,        // List order, failed stubs dropped
    pub failures: Vec<ResolutionFailure>,
    pub upstream_count: u32,          // `count` reported by the list endpoint
}

impl CatalogLoad {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Result of resolving an evolution chain. Failed subtrees are pruned and listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionTree {
    pub root: EvolutionNode,
    pub failures: Vec<ResolutionFailure>,
}

impl EvolutionTree {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
