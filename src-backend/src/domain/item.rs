//! Item Entity
//!
//! A perishable pantry item stored on exactly one shelf.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (assigned on insert)
    pub id: String,
    pub name: String,
    pub category: String,
    /// Always at least 1
    pub quantity: i64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Shelf holding this item
    pub owner_shelf_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        owner_shelf_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            expiry_date: None,
            notes: None,
            owner_shelf_id: owner_shelf_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Item {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn is_new(&self) -> bool {
        self.id.is_empty()
    }
}
