//! Shelf Commands
//!
//! createShelf, deleteShelf and saveShelf.

use super::{ActionResponse, PantryService};
use crate::domain::{DomainError, Shelf};
use crate::repository::Repository;
use crate::validation::{field_error, general_error, validate_form, SaveShelfForm, ShelfIdForm};

impl PantryService {
    pub(super) async fn create_shelf(&self) -> ActionResponse {
        let shelf = Shelf::new(&self.default_shelf_name, &self.default_shelf_type);
        match self.shelves.create(&shelf).await {
            Ok(created) => ActionResponse::Shelf(created),
            Err(e) => ActionResponse::failed(general_error(e.to_string())),
        }
    }

    pub(super) async fn delete_shelf(&self, form: ShelfIdForm) -> ActionResponse {
        if let Err(errors) = validate_form(&form) {
            return ActionResponse::failed(errors);
        }
        match self.shelves.delete(form.shelf_id).await {
            Ok(deleted) => ActionResponse::Shelf(deleted),
            Err(e) => shelf_failure(e),
        }
    }

    pub(super) async fn save_shelf(&self, form: SaveShelfForm) -> ActionResponse {
        if let Err(errors) = validate_form(&form) {
            return ActionResponse::failed(errors);
        }
        match self.shelves.rename(&form.shelf_id, &form.shelf_name).await {
            Ok(updated) => ActionResponse::Shelf(updated),
            Err(e) => shelf_failure(e),
        }
    }
}

fn shelf_failure(error: DomainError) -> ActionResponse {
    match error {
        DomainError::NotFound(_) => ActionResponse::failed(field_error("shelfId", "Shelf not found")),
        other => ActionResponse::failed(general_error(other.to_string())),
    }
}
