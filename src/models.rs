//! Frontend Models
//!
//! Data structures matching backend entities, plus the placeholder
//! constructors used while a create is in flight.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every client-assigned id. Server ids never start with it.
pub const OPTIMISTIC_ID_PREFIX: &str = "optimistic-";

/// Name given to a shelf created from the "add shelf" button
pub const DEFAULT_SHELF_NAME: &str = "New Shelf";

/// Type given to a shelf created from the "add shelf" button
pub const DEFAULT_SHELF_TYPE: &str = "custom";

/// Items expiring within this many days are flagged
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// Anything rendered as a row keyed by a string id
pub trait Entity: Clone {
    fn id(&self) -> &str;

    /// True for client-originated entities the server has not confirmed
    fn is_optimistic(&self) -> bool;
}

/// Whether `id` was assigned on the client
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(OPTIMISTIC_ID_PREFIX)
}

/// Pantry item (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub owner_shelf_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_optimistic: bool,
}

impl Item {
    /// Speculative row shown while a create-item request is in flight
    pub fn placeholder(id: String, draft: &ItemDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            quantity: draft.quantity,
            unit: draft.unit.clone(),
            expiry_date: draft
                .expiry_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            notes: draft.notes.clone().filter(|n| !n.trim().is_empty()),
            owner_shelf_id: draft.owner_shelf_id.clone(),
            created_at: now,
            updated_at: now,
            is_optimistic: true,
        }
    }

    /// An item counts as expired from the start of its expiry date
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d <= today)
    }

    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| {
            let days_left = d.signed_duration_since(today).num_days();
            days_left > 0 && days_left <= EXPIRING_SOON_DAYS
        })
    }
}

impl Entity for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_optimistic(&self) -> bool {
        self.is_optimistic
    }
}

/// Pantry shelf with its items (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelf {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub shelf_type: String,
    pub order: i32,
    #[serde(default)]
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_optimistic: bool,
}

impl Shelf {
    /// Speculative shelf shown while a create-shelf request is in flight
    pub fn placeholder(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: DEFAULT_SHELF_NAME.to_string(),
            shelf_type: DEFAULT_SHELF_TYPE.to_string(),
            order: 0,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            is_optimistic: true,
        }
    }
}

impl Entity for Shelf {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_optimistic(&self) -> bool {
        self.is_optimistic
    }
}

/// Fields of the create-item form, kept as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub owner_shelf_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields of the edit-item form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Field-level error messages keyed by form field (`general` for the rest)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub const GENERAL: &'static str = "general";

    pub fn new() -> Self {
        Self::default()
    }

    /// Single `general` error
    pub fn general(message: impl Into<String>) -> Self {
        Self::single(Self::GENERAL, message)
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// The message shown in a row banner: `field` first, then `general`,
    /// then whatever else was reported.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.get(field)
            .or_else(|| self.get(Self::GENERAL))
            .or_else(|| self.first())
    }

    pub fn first(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
