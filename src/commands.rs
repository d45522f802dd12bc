//! Endpoint Commands
//!
//! Request/response types for the single mutation endpoint and the read
//! endpoint, and the trait the controller drives them through.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{FieldErrors, Item, ItemDraft, ItemUpdate, Shelf};

// ========================
// Requests
// ========================

/// The six mutation kinds, one channel per kind and scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    CreateShelf,
    DeleteShelf,
    SaveShelf,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::CreateShelf => "createShelf",
            MutationKind::DeleteShelf => "deleteShelf",
            MutationKind::SaveShelf => "saveShelf",
            MutationKind::CreateItem => "createItem",
            MutationKind::UpdateItem => "updateItem",
            MutationKind::DeleteItem => "deleteItem",
        }
    }

    /// Form field whose error is shown on the targeted row
    pub fn target_field(&self) -> &'static str {
        match self {
            MutationKind::DeleteShelf => "shelfId",
            MutationKind::SaveShelf => "shelfName",
            MutationKind::DeleteItem => "itemId",
            _ => FieldErrors::GENERAL,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation request body, discriminated by `_action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_action", rename_all = "camelCase")]
pub enum MutationRequest {
    CreateShelf,
    DeleteShelf {
        #[serde(rename = "shelfId")]
        shelf_id: String,
    },
    SaveShelf {
        #[serde(rename = "shelfId")]
        shelf_id: String,
        #[serde(rename = "shelfName")]
        shelf_name: String,
    },
    CreateItem(ItemDraft),
    UpdateItem(ItemUpdate),
    DeleteItem {
        #[serde(rename = "itemId")]
        item_id: String,
    },
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::CreateShelf => MutationKind::CreateShelf,
            MutationRequest::DeleteShelf { .. } => MutationKind::DeleteShelf,
            MutationRequest::SaveShelf { .. } => MutationKind::SaveShelf,
            MutationRequest::CreateItem(_) => MutationKind::CreateItem,
            MutationRequest::UpdateItem(_) => MutationKind::UpdateItem,
            MutationRequest::DeleteItem { .. } => MutationKind::DeleteItem,
        }
    }

    /// Id of the existing row this request acts on, if any
    pub fn target_id(&self) -> Option<&str> {
        match self {
            MutationRequest::CreateShelf | MutationRequest::CreateItem(_) => None,
            MutationRequest::DeleteShelf { shelf_id } => Some(shelf_id),
            MutationRequest::SaveShelf { shelf_id, .. } => Some(shelf_id),
            MutationRequest::UpdateItem(update) => Some(&update.id),
            MutationRequest::DeleteItem { item_id } => Some(item_id),
        }
    }
}

// ========================
// Responses
// ========================

/// What the mutation endpoint answers: an error map or the touched entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MutationResponse {
    Failed { errors: FieldErrors },
    Shelf(Shelf),
    Item(Item),
}

impl MutationResponse {
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            MutationResponse::Failed { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Failure outside the response contract (transport, undecodable body)
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Mutation and read endpoints as seen from the UI thread
#[async_trait(?Send)]
pub trait PantryEndpoint {
    async fn mutate(&self, request: &MutationRequest) -> Result<MutationResponse, EndpointError>;

    /// All shelves whose name contains `query` (case-insensitive)
    async fn load(&self, query: Option<&str>) -> Result<Vec<Shelf>, EndpointError>;
}

// ========================
// JSON helpers
// ========================

pub fn encode_request(request: &MutationRequest) -> Result<Value, EndpointError> {
    Ok(serde_json::to_value(request)?)
}

pub fn decode_response(value: Value) -> Result<MutationResponse, EndpointError> {
    Ok(serde_json::from_value(value)?)
}

pub fn decode_shelves(value: Value) -> Result<Vec<Shelf>, EndpointError> {
    Ok(serde_json::from_value(value)?)
}
