//! Form Validation
//!
//! Request bodies of the mutation endpoint and their field rules. Failures
//! come back as a `field -> message` map keyed by the camelCase form field.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

/// Field-level messages, `general` for errors not tied to a field
pub type FieldErrors = BTreeMap<String, String>;

pub const GENERAL: &str = "general";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShelfIdForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Shelf ID is required"))]
    pub shelf_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveShelfForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Shelf name cannot be empty"))]
    pub shelf_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Shelf ID is required"))]
    pub shelf_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Item ID is required"))]
    pub item_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Shelf ID is required"))]
    pub owner_shelf_id: String,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Item ID is required"))]
    pub id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Run the derive rules of `form` and collect one message per field
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    let Err(errors) = form.validate() else {
        return Ok(());
    };

    let mut fields = FieldErrors::new();
    for (field, failures) in errors.field_errors() {
        let message = failures
            .first()
            .and_then(|f| f.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} is invalid", field));
        fields.insert(camel_case(&field), message);
    }
    Err(fields)
}

/// Optional `YYYY-MM-DD` date; blank means none
pub fn parse_expiry_date(value: Option<&str>) -> Result<Option<NaiveDate>, FieldErrors> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                let mut errors = FieldErrors::new();
                errors.insert("expiryDate".to_string(), "Expiry date must be a valid date".to_string());
                errors
            }),
    }
}

/// Blank notes are stored as null
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}

pub fn general_error(message: impl Into<String>) -> FieldErrors {
    field_error(GENERAL, message)
}

pub fn field_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    errors
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
