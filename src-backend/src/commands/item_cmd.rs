//! Item Commands
//!
//! createItem, updateItem and deleteItem.

use super::{ActionResponse, PantryService};
use crate::domain::{DomainError, Item};
use crate::repository::Repository;
use crate::validation::{
    general_error, normalize_notes, parse_expiry_date, validate_form, CreateItemForm, ItemIdForm,
    UpdateItemForm,
};

impl PantryService {
    pub(super) async fn create_item(&self, form: CreateItemForm) -> ActionResponse {
        if let Err(errors) = validate_form(&form) {
            return ActionResponse::failed(errors);
        }
        let expiry_date = match parse_expiry_date(form.expiry_date.as_deref()) {
            Ok(date) => date,
            Err(errors) => return ActionResponse::failed(errors),
        };

        let mut item = Item::new(form.owner_shelf_id, form.name, form.category, form.quantity, form.unit);
        item.expiry_date = expiry_date;
        item.notes = normalize_notes(form.notes);

        match self.items.create(&item).await {
            Ok(created) => ActionResponse::Item(created),
            Err(e) => item_failure(e),
        }
    }

    pub(super) async fn update_item(&self, form: UpdateItemForm) -> ActionResponse {
        if let Err(errors) = validate_form(&form) {
            return ActionResponse::failed(errors);
        }
        let expiry_date = match parse_expiry_date(form.expiry_date.as_deref()) {
            Ok(date) => date,
            Err(errors) => return ActionResponse::failed(errors),
        };

        let existing = match self.items.find_by_id(form.id.clone()).await {
            Ok(Some(item)) => item,
            Ok(None) => return item_failure(DomainError::NotFound("Item not found".to_string())),
            Err(e) => return item_failure(e),
        };

        let item = Item {
            name: form.name,
            category: form.category,
            quantity: form.quantity,
            unit: form.unit,
            expiry_date,
            notes: normalize_notes(form.notes),
            ..existing
        };
        match self.items.update(&item).await {
            Ok(updated) => ActionResponse::Item(updated),
            Err(e) => item_failure(e),
        }
    }

    pub(super) async fn delete_item(&self, form: ItemIdForm) -> ActionResponse {
        if let Err(errors) = validate_form(&form) {
            return ActionResponse::failed(errors);
        }
        match self.items.delete(form.item_id).await {
            Ok(deleted) => ActionResponse::Item(deleted),
            Err(e) => item_failure(e),
        }
    }
}

/// Item failures all surface as a general banner
fn item_failure(error: DomainError) -> ActionResponse {
    let message = match error {
        DomainError::NotFound(message) => message,
        other => other.to_string(),
    };
    ActionResponse::failed(general_error(message))
}
