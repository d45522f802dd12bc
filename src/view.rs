//! View Models
//!
//! What the page renders, derived from the reconciled list, the channels
//! and the correlation map. Nothing here mutates state.

use serde::Serialize;

use crate::models::{Item, Shelf};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    pub item: Item,
    pub is_placeholder: bool,
    pub is_updating: bool,
    pub is_expired: bool,
    /// Expires within a week, not yet expired
    pub is_expiring_soon: bool,
    /// Error from the last update or delete of this row
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfRow {
    pub shelf: Shelf,
    pub items: Vec<ItemRow>,
    pub is_placeholder: bool,
    pub is_saving: bool,
    pub save_error: Option<String>,
    pub delete_error: Option<String>,
    pub create_item_pending: bool,
    pub create_item_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryView {
    pub shelves: Vec<ShelfRow>,
    pub total_items: usize,
    pub categories: Vec<CategoryCount>,
    pub query: Option<String>,
    pub is_creating_shelf: bool,
    pub create_shelf_error: Option<String>,
}

impl PantryView {
    pub fn shelf(&self, id: &str) -> Option<&ShelfRow> {
        self.shelves.iter().find(|row| row.shelf.id == id)
    }

    /// No shelves at all, not even placeholders
    pub fn is_empty(&self) -> bool {
        self.shelves.is_empty()
    }

    pub fn has_no_items(&self) -> bool {
        self.total_items == 0
    }
}

/// Number of items across all rendered shelves
pub fn total_items(shelves: &[ShelfRow]) -> usize {
    shelves.iter().map(|row| row.items.len()).sum()
}

/// Item count per category, categories in first-seen order
pub fn category_counts(shelves: &[ShelfRow]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for row in shelves.iter().flat_map(|shelf| shelf.items.iter()) {
        match counts.iter_mut().find(|c| c.category == row.item.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: row.item.category.clone(),
                count: 1,
            }),
        }
    }
    counts
}
