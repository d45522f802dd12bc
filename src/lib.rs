//! Pantry UI State
//!
//! Optimistic list state for pantry shelves and their items:
//! - models: shelf/item records and placeholders
//! - commands: mutation/read endpoint contract
//! - channel: per-kind request lifecycle
//! - store, reconcile, bindings: speculative state and how it is merged
//! - context: the controller a list view owns

pub mod bindings;
pub mod channel;
pub mod commands;
pub mod context;
pub mod correlation;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod view;

pub use channel::{ChannelScope, LifecycleState, MutationChannel, Resolution, Ticket, Transition};
pub use commands::{EndpointError, MutationKind, MutationRequest, MutationResponse, PantryEndpoint};
pub use context::{ControllerError, PantryController};
pub use models::{FieldErrors, Item, ItemDraft, ItemUpdate, Shelf};
pub use view::{ItemRow, PantryView, ShelfRow};
