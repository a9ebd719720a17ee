//! In-memory filtering and pagination over resolved entities.
//!
//! Everything here is pure and synchronous. Results keep the input order and
//! borrow from the input; nothing is re-sorted or copied.

use schema::{Entity, MoveDetail};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Base attack bucket. `High` is strictly above 80, `Low` is 80 and below.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AttackBucket {
    #[default]
    All,
    High,
    Low,
}

impl AttackBucket {
    pub const HIGH_ABOVE: u32 = 80;

    pub fn matches(self, attack: u32) -> bool {
        match self {
            AttackBucket::All => true,
            AttackBucket::High => attack > Self::HIGH_ABOVE,
            AttackBucket::Low => attack <= Self::HIGH_ABOVE,
        }
    }
}

/// Weight bucket in kilograms: light < 10, medium [10, 50), heavy >= 50.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WeightBucket {
    #[default]
    All,
    Light,
    Medium,
    Heavy,
}

impl WeightBucket {
    pub const MEDIUM_FROM_KG: f64 = 10.0;
    pub const HEAVY_FROM_KG: f64 = 50.0;

    pub fn matches(self, weight_kg: f64) -> bool {
        match self {
            WeightBucket::All => true,
            WeightBucket::Light => weight_kg < Self::MEDIUM_FROM_KG,
            WeightBucket::Medium => {
                weight_kg >= Self::MEDIUM_FROM_KG && weight_kg < Self::HEAVY_FROM_KG
            }
            WeightBucket::Heavy => weight_kg >= Self::HEAVY_FROM_KG,
        }
    }
}

/// Conjunction of a name search and the two buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub name: String,
    pub attack: AttackBucket,
    pub weight: WeightBucket,
}

impl CatalogFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_attack(mut self, attack: AttackBucket) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_weight(mut self, weight: WeightBucket) -> Self {
        self.weight = weight;
        self
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        name_contains(&entity.name, &self.name)
            && self.attack.matches(entity.attack())
            && self.weight.matches(entity.weight_kg())
    }

    pub fn apply<'a>(&self, entities: &'a [Entity]) -> Vec<&'a Entity> {
        entities.iter().filter(|e| self.matches(e)).collect()
    }
}

fn name_contains(name: &str, term: &str) -> bool {
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_size: usize,
    pub page_number: usize,
}

impl PageRequest {
    pub fn new(page_size: usize, page_number: usize) -> Self {
        Self {
            page_size,
            page_number,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 1)
    }
}

/// The `[(page-1)*size, page*size)` window of `items`, clamped to its end.
/// Page 0, size 0 and pages past the end all yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    let Some(start) = page_number
        .checked_sub(1)
        .and_then(|index| index.checked_mul(page_size))
    else {
        return &[];
    };
    if page_size == 0 || start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a Entity>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize, // After filtering
    pub total_pages: usize,
}

/// Filter, then paginate.
pub fn query_catalog<'a>(
    entities: &'a [Entity],
    filter: &CatalogFilter,
    page: PageRequest,
) -> CatalogPage<'a> {
    let filtered = filter.apply(entities);
    let items = paginate(&filtered, page.page_size, page.page_number).to_vec();
    CatalogPage {
        items,
        page_number: page.page_number,
        page_size: page.page_size,
        total_items: filtered.len(),
        total_pages: total_pages(filtered.len(), page.page_size),
    }
}

/// One slot of a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageMarker {
    Page(usize),
    Gap,
}

pub const PAGE_WINDOW_RADIUS: usize = 2;

/// Page numbers worth showing: the first, the last, and those within two of
/// `current`, with a `Gap` wherever numbers are skipped.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    let mut previous: Option<usize> = None;

    for page in 1..=total_pages {
        let visible = page == 1 || page == total_pages || page.abs_diff(current) <= PAGE_WINDOW_RADIUS;
        if !visible {
            continue;
        }
        if previous.is_some_and(|p| p + 1 != page) {
            markers.push(PageMarker::Gap);
        }
        markers.push(PageMarker::Page(page));
        previous = Some(page);
    }
    markers
}

/// Case-insensitive name search over resolved moves, in input order.
pub fn search_moves<'a, I>(moves: I, term: &str) -> Vec<&'a MoveDetail>
where
    I: IntoIterator<Item = &'a MoveDetail>,
{
    moves
        .into_iter()
        .filter(|m| name_contains(&m.name, term))
        .collect()
}
