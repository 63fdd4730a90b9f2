//! The filtered, sorted view of the collection.
//!
//! Projections are recomputed from scratch and never touch the collection
//! they are computed from.

use wardrobe_domain::{Item, SortSpec};

/// Case-insensitive substring match against name, brand, category, or any tag.
/// `needle` must already be lower-cased.
pub fn matches_query(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.name.to_lowercase().contains(needle)
        || item
            .brand
            .as_deref()
            .is_some_and(|b| b.to_lowercase().contains(needle))
        || item.category.as_str().contains(needle)
        || item.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Filter `items` by `query` (when non-blank) and stable-sort by `sort`.
pub fn project(items: &[Item], query: &str, sort: &SortSpec) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    let mut projected: Vec<Item> = items
        .iter()
        .filter(|item| matches_query(item, &needle))
        .cloned()
        .collect();
    projected.sort_by(|a, b| sort.compare(a, b));
    projected
}
