//! Lifecycle Bindings
//!
//! Transition handlers that keep the optimistic stores in step with the
//! channels. Every handler keys off the submitted payload (or the submission
//! sequence for creates), so replaying a transition leaves the store as is.

use crate::channel::{Phase, Transition};
use crate::commands::MutationRequest;
use crate::store::{ItemStore, ShelfStore};

pub trait LifecycleBinding {
    /// Apply one channel transition; returns true if the store changed
    fn on_transition(&mut self, transition: &Transition) -> bool;
}

impl LifecycleBinding for ShelfStore {
    fn on_transition(&mut self, transition: &Transition) -> bool {
        match (&transition.request, &transition.phase) {
            (MutationRequest::CreateShelf, Phase::Began) => {
                let before = self.pending().len();
                let id = self.begin_create_shelf(transition.ticket.seq);
                log::debug!("placeholder shelf {} added", id);
                self.pending().len() != before
            }
            (MutationRequest::CreateShelf, Phase::Resolved(resolution)) => {
                if !resolution.is_success() {
                    log::warn!("create shelf failed, dropping placeholder");
                }
                self.commit_create_shelf() > 0
            }
            (MutationRequest::DeleteShelf { shelf_id }, Phase::Began) => {
                self.begin_delete_shelf(shelf_id)
            }
            (MutationRequest::DeleteShelf { shelf_id }, Phase::Resolved(resolution)) => {
                if !resolution.is_success() {
                    log::warn!("delete of shelf {} failed, showing it again", shelf_id);
                }
                self.end_delete_shelf(shelf_id)
            }
            _ => false,
        }
    }
}

impl LifecycleBinding for ItemStore {
    fn on_transition(&mut self, transition: &Transition) -> bool {
        match (&transition.request, &transition.phase) {
            (MutationRequest::CreateItem(draft), Phase::Began) => {
                let before = self.pending().len();
                self.begin_create_item(transition.ticket.seq, draft);
                self.pending().len() != before
            }
            (MutationRequest::CreateItem(_), Phase::Resolved(resolution)) => {
                if !resolution.is_success() {
                    log::warn!("create item failed, dropping placeholder");
                }
                self.commit_create_item() > 0
            }
            (MutationRequest::DeleteItem { item_id }, Phase::Began) => {
                self.begin_delete_item(item_id)
            }
            (MutationRequest::DeleteItem { item_id }, Phase::Resolved(resolution)) => {
                if !resolution.is_success() {
                    log::warn!("delete of item {} failed, showing it again", item_id);
                }
                self.end_delete_item(item_id)
            }
            // Updates render the pre-edit row until the next snapshot
            _ => false,
        }
    }
}
