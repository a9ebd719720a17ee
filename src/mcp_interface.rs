//! Text rendering for the MCP server.
//!
//! These functions turn resolved catalog data into the plain-text responses the
//! MCP tools return. They hold no state and perform no I/O, so the server binary
//! stays a thin adapter and the formatting can be tested directly.

use crate::errors::CatalogError;
use crate::query::{page_window, search_moves, AttackBucket, CatalogFilter, CatalogPage, PageMarker, WeightBucket};
use crate::resolver::{CatalogLoad, EvolutionTree, PartialResult};
use schema::{Entity, EvolutionNode, MoveDetail, StatName};
use std::fmt::Write;

const LABEL_WIDTH: usize = 12;

fn stat_label(stat: StatName) -> &'static str {
    match stat {
        StatName::Hp => "HP",
        StatName::Attack => "Attack",
        StatName::Defense => "Defense",
        StatName::SpecialAttack => "Sp. Atk",
        StatName::SpecialDefense => "Sp. Def",
        StatName::Speed => "Speed",
    }
}

/// Build a filter from loosely typed tool arguments. Missing buckets mean "all".
pub fn parse_filter(
    name: Option<&str>,
    attack: Option<&str>,
    weight: Option<&str>,
) -> Result<CatalogFilter, String> {
    let attack = match attack {
        Some(value) => value
            .parse::<AttackBucket>()
            .map_err(|_| format!("Unknown attack filter '{}'. Use all, high or low.", value))?,
        None => AttackBucket::All,
    };
    let weight = match weight {
        Some(value) => value.parse::<WeightBucket>().map_err(|_| {
            format!(
                "Unknown weight filter '{}'. Use all, light, medium or heavy.",
                value
            )
        })?,
        None => WeightBucket::All,
    };
    Ok(CatalogFilter::default()
        .with_name(name.unwrap_or_default())
        .with_attack(attack)
        .with_weight(weight))
}

pub fn format_catalog_summary(load: &CatalogLoad) -> String {
    let mut output = format!(
        "Catalog loaded: {} species resolved ({} listed upstream).\n",
        load.entities.len(),
        load.upstream_count
    );
    if load.is_partial() {
        let _ = writeln!(
            output,
            "{} species could not be resolved and are missing:",
            load.failures.len()
        );
        for failure in &load.failures {
            let _ = writeln!(output, "  - {}: {}", failure.reference, failure.error);
        }
    }
    output
}

pub fn format_catalog_page(page: &CatalogPage<'_>) -> String {
    if page.items.is_empty() {
        return format!(
            "No Pokemon on page {} ({} match the filter).",
            page.page_number, page.total_items
        );
    }

    let mut output = format!(
        "Page {} of {} ({} matching Pokemon):\n",
        page.page_number, page.total_pages, page.total_items
    );
    for entity in &page.items {
        let _ = writeln!(
            output,
            "  {} | Atk {} | {:.1} kg",
            entity,
            entity.attack(),
            entity.weight_kg()
        );
    }

    let markers: Vec<String> = page_window(page.page_number, page.total_pages)
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == page.page_number => format!("[{}]", n),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Gap => "...".to_string(),
        })
        .collect();
    let _ = write!(output, "Pages: {}", markers.join(" "));
    output
}

/// Name, types, size and base stats of one species.
pub fn format_entity_detailed(entity: &Entity) -> String {
    let mut output = String::new();

    // --- 1. Name and Pokedex Number ---
    let _ = writeln!(output, "{} (#{:03})", entity.name, entity.id);
    let _ = writeln!(output, "--------------------");

    // --- 2. Types and size ---
    let _ = writeln!(output, "Type(s): {}", entity.types.join(" / "));
    let _ = writeln!(output, "Height: {:.1} m", entity.height_m());
    let _ = writeln!(output, "Weight: {:.1} kg", entity.weight_kg());
    let _ = writeln!(output, "Moves known: {}", entity.move_refs.len());
    let _ = writeln!(output, "--------------------");

    // --- 3. Base Stats ---
    let _ = writeln!(output, "Base Stats:");
    for (stat, value) in entity.base_stats.iter() {
        let _ = writeln!(output, "{:<LABEL_WIDTH$} : {}", stat_label(stat), value);
    }
    let _ = write!(output, "{:<LABEL_WIDTH$} : {}", "Total", entity.base_stats.total());
    output
}

/// `*` marks the larger of two values; ties are unmarked.
fn compared(value: u32, other: u32) -> String {
    if value > other {
        format!("{}*", value)
    } else {
        value.to_string()
    }
}

/// Two species side by side: types, size, then every base stat and the total.
pub fn format_comparison(left: &Entity, right: &Entity) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} (#{:03}) vs {} (#{:03})",
        left.name, left.id, right.name, right.id
    );
    let _ = writeln!(output, "--------------------");
    let _ = writeln!(
        output,
        "{:<LABEL_WIDTH$} : {} | {}",
        "Type(s)",
        left.types.join(" / "),
        right.types.join(" / ")
    );
    let _ = writeln!(
        output,
        "{:<LABEL_WIDTH$} : {:.1} m | {:.1} m",
        "Height",
        left.height_m(),
        right.height_m()
    );
    let _ = writeln!(
        output,
        "{:<LABEL_WIDTH$} : {:.1} kg | {:.1} kg",
        "Weight",
        left.weight_kg(),
        right.weight_kg()
    );
    let _ = writeln!(output, "--------------------");

    for ((stat, a), (_, b)) in left.base_stats.iter().zip(right.base_stats.iter()) {
        let _ = writeln!(
            output,
            "{:<LABEL_WIDTH$} : {} | {}",
            stat_label(stat),
            compared(a, b),
            compared(b, a)
        );
    }
    let (a, b) = (left.base_stats.total(), right.base_stats.total());
    let _ = write!(
        output,
        "{:<LABEL_WIDTH$} : {} | {}",
        "Total",
        compared(a, b),
        compared(b, a)
    );
    output
}

/// Up to `limit` moves matching `term`, then a note about anything unresolved.
pub fn format_moves(result: &PartialResult<MoveDetail>, term: &str, limit: usize) -> String {
    let matching = search_moves(result.resolved(), term);
    let mut output = format!(
        "{} moves ({} shown):\n",
        matching.len(),
        matching.len().min(limit)
    );
    for detail in matching.iter().take(limit) {
        let _ = writeln!(output, "  {}", detail);
    }
    if !result.is_complete() {
        let _ = write!(
            output,
            "{} moves could not be loaded and are not listed.",
            result.failure_count()
        );
    }
    output
}

fn write_node(output: &mut String, node: &EvolutionNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let arrow = if depth == 0 { "" } else { "-> " };
    let _ = writeln!(output, "{}{}{} (#{:03})", indent, arrow, node.name, node.id);
    for child in &node.children {
        write_node(output, child, depth + 1);
    }
}

pub fn format_evolution_tree(tree: &EvolutionTree) -> String {
    let mut output = String::from("Evolution Chain:\n");
    write_node(&mut output, &tree.root, 0);
    for failure in &tree.failures {
        let _ = writeln!(output, "(missing {}: {})", failure.reference, failure.error);
    }
    output
}

pub fn format_error(context: &str, error: &CatalogError) -> String {
    match error {
        CatalogError::NotFound { .. } => format!("{}: no such Pokemon.", context),
        _ if error.is_retryable() => format!("{}: {} (try again shortly)", context, error),
        _ => format!("{}: {}", context, error),
    }
}
