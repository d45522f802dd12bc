//! Shelf Entity
//!
//! A named storage shelf holding pantry items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::item::Item;

pub const DEFAULT_SHELF_NAME: &str = "New Shelf";
pub const DEFAULT_SHELF_TYPE: &str = "custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelf {
    /// Unique identifier (assigned on insert)
    pub id: String,
    pub name: String,
    /// Free-form kind, "custom" for user-created shelves
    #[serde(rename = "type")]
    pub shelf_type: String,
    /// Sort key, ascending
    pub order: i32,
    /// Items on this shelf, newest first
    #[serde(default)]
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shelf {
    /// A shelf not yet stored; id and timestamps are set by the repository
    pub fn new(name: impl Into<String>, shelf_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            shelf_type: shelf_type.into(),
            order: 0,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match on the name
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

impl Default for Shelf {
    fn default() -> Self {
        Self::new(DEFAULT_SHELF_NAME, DEFAULT_SHELF_TYPE)
    }
}

impl Entity for Shelf {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn is_new(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shelf() {
        let shelf = Shelf::default();
        assert_eq!(shelf.name, "New Shelf");
        assert_eq!(shelf.shelf_type, "custom");
        assert_eq!(shelf.order, 0);
        assert!(shelf.items.is_empty());
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let shelf = Shelf::new("Fridge Door", "custom");
        assert!(shelf.name_matches("fridge"));
        assert!(shelf.name_matches("DOOR"));
        assert!(shelf.name_matches(""));
        assert!(!shelf.name_matches("freezer"));
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(Shelf::default()).unwrap();
        assert_eq!(json["type"], "custom");
        assert!(json.get("createdAt").is_some());
    }
}
