//! Optimistic Store
//!
//! Speculative entities not yet confirmed by the server and the ids hidden
//! while their delete is in flight. One store holds the shelves of a list;
//! each shelf card owns another one for its items.

use std::collections::{BTreeSet, HashSet};

use crate::models::{Entity, Item, ItemDraft, Shelf, OPTIMISTIC_ID_PREFIX};

#[derive(Debug, Clone)]
pub struct OptimisticStore<T> {
    /// Placeholders in creation order
    pending: Vec<T>,
    /// Ids hidden while their delete is in flight
    deleting: BTreeSet<String>,
}

impl<T> Default for OptimisticStore<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            deleting: BTreeSet::new(),
        }
    }
}

/// Store of speculative shelves for one list
pub type ShelfStore = OptimisticStore<Shelf>;

/// Store of speculative items for one shelf card
pub type ItemStore = OptimisticStore<Item>;

/// Temporary id for the placeholder of submission `seq` on `scope`
pub fn temp_id(scope: &str, seq: u64) -> String {
    format!("{OPTIMISTIC_ID_PREFIX}{scope}-{seq}")
}

impl<T: Entity> OptimisticStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a placeholder. Returns false if its id is already pending.
    pub fn begin_create(&mut self, placeholder: T) -> bool {
        if self.pending.iter().any(|p| p.id() == placeholder.id()) {
            return false;
        }
        self.pending.push(placeholder);
        true
    }

    /// Drop every placeholder; returns how many were removed
    pub fn commit_create(&mut self) -> usize {
        let before = self.pending.len();
        self.pending.clear();
        before
    }

    pub fn begin_delete(&mut self, id: &str) -> bool {
        self.deleting.insert(id.to_string())
    }

    pub fn end_delete(&mut self, id: &str) -> bool {
        self.deleting.remove(id)
    }

    /// Drop placeholders whose id the server now reports
    pub fn prune_confirmed(&mut self, authoritative_ids: &HashSet<&str>) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !authoritative_ids.contains(p.id()));
        before - self.pending.len()
    }

    pub fn pending(&self) -> &[T] {
        &self.pending
    }

    pub fn deleting_ids(&self) -> &BTreeSet<String> {
        &self.deleting
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.deleting.is_empty()
    }
}

impl OptimisticStore<Shelf> {
    /// Placeholder shelf for create-shelf submission `seq`; returns its id
    pub fn begin_create_shelf(&mut self, seq: u64) -> String {
        let id = temp_id("shelf", seq);
        self.begin_create(Shelf::placeholder(id.clone()));
        id
    }

    pub fn commit_create_shelf(&mut self) -> usize {
        self.commit_create()
    }

    pub fn begin_delete_shelf(&mut self, id: &str) -> bool {
        self.begin_delete(id)
    }

    pub fn end_delete_shelf(&mut self, id: &str) -> bool {
        self.end_delete(id)
    }
}

impl OptimisticStore<Item> {
    /// Placeholder item for create-item submission `seq`; returns its id
    pub fn begin_create_item(&mut self, seq: u64, draft: &ItemDraft) -> String {
        let id = temp_id("item", seq);
        self.begin_create(Item::placeholder(id.clone(), draft));
        id
    }

    pub fn commit_create_item(&mut self) -> usize {
        self.commit_create()
    }

    pub fn begin_delete_item(&mut self, id: &str) -> bool {
        self.begin_delete(id)
    }

    pub fn end_delete_item(&mut self, id: &str) -> bool {
        self.end_delete(id)
    }
}
