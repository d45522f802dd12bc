//! Domain Layer
//!
//! Shelves, items and the errors storage can raise. No database code here.

mod entity;
mod item;
mod shelf;

pub use entity::{DomainError, DomainResult, Entity};
pub use item::Item;
pub use shelf::{Shelf, DEFAULT_SHELF_NAME, DEFAULT_SHELF_TYPE};
