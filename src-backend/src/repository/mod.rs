//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod item_repo;
mod shelf_repo;
mod traits;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState, SharedConnection};
pub use item_repo::ItemRepository;
pub use shelf_repo::ShelfRepository;
pub use traits::{Repository, SearchableRepository};
