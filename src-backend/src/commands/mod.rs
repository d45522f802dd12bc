//! Pantry Endpoint Commands
//!
//! One mutation endpoint discriminated by `_action`, plus the read endpoint.
//! Validation, not-found and persistence failures are returned as
//! `{errors: {...}}` bodies; nothing here panics on bad input.

mod item_cmd;
mod shelf_cmd;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BackendConfig;
use crate::domain::{DomainResult, Item, Shelf};
use crate::repository::{DbState, ItemRepository, Repository, SearchableRepository, ShelfRepository};
use crate::validation::{
    CreateItemForm, FieldErrors, ItemIdForm, SaveShelfForm, ShelfIdForm, UpdateItemForm,
};

/// Mutation request body
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_action", rename_all = "camelCase")]
pub enum Action {
    CreateShelf,
    DeleteShelf(ShelfIdForm),
    SaveShelf(SaveShelfForm),
    CreateItem(CreateItemForm),
    UpdateItem(UpdateItemForm),
    DeleteItem(ItemIdForm),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateShelf => "createShelf",
            Action::DeleteShelf(_) => "deleteShelf",
            Action::SaveShelf(_) => "saveShelf",
            Action::CreateItem(_) => "createItem",
            Action::UpdateItem(_) => "updateItem",
            Action::DeleteItem(_) => "deleteItem",
        }
    }
}

/// Mutation response body: an error map or the touched entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Failed { errors: FieldErrors },
    Shelf(Shelf),
    Item(Item),
}

impl ActionResponse {
    pub fn failed(errors: FieldErrors) -> Self {
        ActionResponse::Failed { errors }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ActionResponse::Failed { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Handles pantry requests against the shared database
pub struct PantryService {
    shelves: ShelfRepository,
    items: ItemRepository,
    default_shelf_name: String,
    default_shelf_type: String,
}

impl PantryService {
    pub fn new(db_state: &DbState, config: &BackendConfig) -> Self {
        Self {
            shelves: ShelfRepository::new(db_state.connection()),
            items: ItemRepository::new(db_state.connection()),
            default_shelf_name: config.default_shelf_name.clone(),
            default_shelf_type: config.default_shelf_type.clone(),
        }
    }

    pub async fn handle(&self, action: Action) -> ActionResponse {
        let name = action.name();
        let response = match action {
            Action::CreateShelf => self.create_shelf().await,
            Action::DeleteShelf(form) => self.delete_shelf(form).await,
            Action::SaveShelf(form) => self.save_shelf(form).await,
            Action::CreateItem(form) => self.create_item(form).await,
            Action::UpdateItem(form) => self.update_item(form).await,
            Action::DeleteItem(form) => self.delete_item(form).await,
        };
        match response.errors() {
            Some(errors) => log::info!("{} rejected: {:?}", name, errors),
            None => log::info!("{} ok", name),
        }
        response
    }

    /// JSON in, JSON out. An unknown or malformed `_action` answers `null`.
    pub async fn handle_json(&self, body: Value) -> Value {
        let action: Action = match serde_json::from_value(body) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("unrecognized mutation body: {}", e);
                return Value::Null;
            }
        };
        let response = self.handle(action).await;
        serde_json::to_value(response).unwrap_or(Value::Null)
    }

    /// Read endpoint: shelves whose name contains `query`, ignoring case
    pub async fn load_shelves(&self, query: Option<&str>) -> DomainResult<Vec<Shelf>> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self.shelves.search(q).await,
            None => self.shelves.list().await,
        }
    }
}
