//! Repository Layer - Storage Contracts
//!
//! The mutation and read endpoints only talk to storage through these.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity};

/// Storage for one record type
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert `entity`, returning the stored copy with its new id and timestamps
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// Every record, in display order
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Overwrite the stored copy; `NotFound` when the id is unknown
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Remove by id and hand back the removed record
    async fn delete(&self, id: T::Id) -> DomainResult<T>;
}

/// Case-insensitive name filtering on top of [`Repository`]
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Records whose name contains `query`; blank returns everything
    async fn search(&self, query: &str) -> DomainResult<Vec<T>>;
}
