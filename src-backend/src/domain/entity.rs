//! Domain Layer - Stored Records
//!
//! Shelves and items share one contract: a server-assigned string id.

/// A record the repositories can store and look up
pub trait Entity: Sized + Send + Sync + Clone {
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    fn id(&self) -> Self::Id;

    /// True until the repository has assigned an id
    fn is_new(&self) -> bool;
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures below the endpoint. `NotFound` carries the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}
