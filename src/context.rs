//! List Controller
//!
//! Owns everything one pantry list needs between renders: the latest
//! server snapshot, the optimistic stores, the channels and the
//! correlation map. Rendering code only reads from it.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};

use crate::bindings::LifecycleBinding;
use crate::channel::{ChannelError, ChannelScope, MutationChannel, Resolution, Ticket, Transition};
use crate::commands::{EndpointError, MutationKind, MutationRequest, MutationResponse, PantryEndpoint};
use crate::correlation::CorrelationMap;
use crate::models::{is_temp_id, FieldErrors, Shelf};
use crate::reconcile::reconcile_shelves;
use crate::store::{ItemStore, ShelfStore};
use crate::view::{category_counts, total_items, ItemRow, PantryView, ShelfRow};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("item {0} is not on any loaded shelf")]
    UnknownItem(String),
    #[error("{0} has not been saved yet")]
    PlaceholderTarget(String),
    #[error("no {kind} channel for ticket #{seq}")]
    UnknownTicket { kind: MutationKind, seq: u64 },
}

type ChannelKey = (MutationKind, ChannelScope);

#[derive(Debug, Default)]
pub struct PantryController {
    query: Option<String>,
    /// Latest authoritative list
    server: Vec<Shelf>,
    shelves: ShelfStore,
    /// Item stores keyed by owning shelf id
    items: HashMap<String, ItemStore>,
    channels: HashMap<ChannelKey, MutationChannel>,
    correlation: CorrelationMap,
    /// Bumped on every state change, for views that poll
    revision: u64,
}

impl PantryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Set the shelf-name filter used by the next load; blank clears it
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query.filter(|q| !q.trim().is_empty());
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn server_shelves(&self) -> &[Shelf] {
        &self.server
    }

    pub fn shelf_store(&self) -> &ShelfStore {
        &self.shelves
    }

    pub fn item_store(&self, shelf_id: &str) -> Option<&ItemStore> {
        self.items.get(shelf_id)
    }

    pub fn channel(&self, kind: MutationKind, scope: &ChannelScope) -> Option<&MutationChannel> {
        self.channels.get(&(kind, scope.clone()))
    }

    pub fn correlation(&self) -> &CorrelationMap {
        &self.correlation
    }

    /// Replace the authoritative list (initial load or revalidation)
    pub fn apply_snapshot(&mut self, shelves: Vec<Shelf>) {
        let shelf_ids: HashSet<&str> = shelves.iter().map(|s| s.id.as_str()).collect();
        let pruned = self.shelves.prune_confirmed(&shelf_ids);
        if pruned > 0 {
            log::debug!("{} confirmed placeholder shelves pruned", pruned);
        }

        for shelf in &shelves {
            if let Some(store) = self.items.get_mut(&shelf.id) {
                let item_ids: HashSet<&str> = shelf.items.iter().map(|i| i.id.as_str()).collect();
                store.prune_confirmed(&item_ids);
            }
        }
        self.items
            .retain(|shelf_id, store| !store.is_empty() || shelf_ids.contains(shelf_id.as_str()));

        let known: HashSet<&str> = shelves
            .iter()
            .flat_map(|s| std::iter::once(s.id.as_str()).chain(s.items.iter().map(|i| i.id.as_str())))
            .collect();
        self.correlation.retain_targets(|id| known.contains(id));

        self.server = shelves;
        self.revision += 1;
    }

    /// Start a mutation. The matching binding runs before this returns.
    pub fn submit(&mut self, request: MutationRequest) -> Result<Ticket, ControllerError> {
        if let Some(target) = placeholder_target(&request) {
            return Err(ControllerError::PlaceholderTarget(target.to_string()));
        }
        let kind = request.kind();
        let scope = self.scope_for(&request)?;

        let channel = self
            .channels
            .entry((kind, scope.clone()))
            .or_insert_with(|| MutationChannel::new(kind, scope));
        let transition = channel.begin(request).map_err(|e| {
            log::warn!("submission refused: {}", e);
            e
        })?;

        log::debug!("{} #{} submitting", kind, transition.ticket.seq);
        self.dispatch(&transition);
        Ok(transition.ticket)
    }

    /// Finish a mutation with whatever the endpoint produced
    pub fn resolve(
        &mut self,
        ticket: &Ticket,
        outcome: Result<MutationResponse, EndpointError>,
    ) -> Result<(), ControllerError> {
        let resolution = Resolution::from_outcome(outcome);
        let channel = self
            .channels
            .get_mut(&(ticket.kind, ticket.scope.clone()))
            .ok_or(ControllerError::UnknownTicket {
                kind: ticket.kind,
                seq: ticket.seq,
            })?;
        let transition = channel.resolve(ticket, resolution)?;

        log::debug!(
            "{} #{} resolved (success: {})",
            ticket.kind,
            ticket.seq,
            transition.resolution().is_some_and(Resolution::is_success)
        );
        self.dispatch(&transition);
        Ok(())
    }

    /// Load the list for the current query. The controller is only borrowed
    /// to read the query and to apply the result, never across the await.
    pub async fn refresh<E>(this: &RefCell<Self>, endpoint: &E) -> Result<(), EndpointError>
    where
        E: PantryEndpoint + ?Sized,
    {
        let query = this.borrow().query.clone();
        let shelves = endpoint.load(query.as_deref()).await?;
        this.borrow_mut().apply_snapshot(shelves);
        Ok(())
    }

    /// Submit, call the endpoint, revalidate, then [`finish`](Self::finish).
    ///
    /// The controller is borrowed only for the submit step and the final
    /// step, so views can render the placeholder (and other channels can
    /// run) while the request is in flight.
    pub async fn run<E>(
        this: &RefCell<Self>,
        endpoint: &E,
        request: MutationRequest,
    ) -> Result<Ticket, ControllerError>
    where
        E: PantryEndpoint + ?Sized,
    {
        let ticket = this.borrow_mut().submit(request.clone())?;
        let outcome = endpoint.mutate(&request).await;

        let query = this.borrow().query.clone();
        let snapshot = endpoint.load(query.as_deref()).await;

        this.borrow_mut().finish(&ticket, outcome, snapshot)?;
        Ok(ticket)
    }

    /// Apply the revalidated list and resolve `ticket` in one step, so a
    /// confirmed create replaces its placeholder without a duplicate frame.
    /// A failed reload keeps the previous snapshot.
    pub fn finish(
        &mut self,
        ticket: &Ticket,
        outcome: Result<MutationResponse, EndpointError>,
        snapshot: Result<Vec<Shelf>, EndpointError>,
    ) -> Result<(), ControllerError> {
        match snapshot {
            Ok(shelves) => self.apply_snapshot(shelves),
            Err(e) => log::warn!("revalidation after {} failed: {}", ticket.kind, e),
        }
        self.resolve(ticket, outcome)
    }

    /// The list as it should be rendered right now
    pub fn shelves(&self) -> Vec<Shelf> {
        reconcile_shelves(&self.server, &self.shelves, &self.items)
    }

    pub fn view(&self) -> PantryView {
        self.view_on(Utc::now().date_naive())
    }

    /// The view with expiry flags computed for `today`
    pub fn view_on(&self, today: NaiveDate) -> PantryView {
        let rows: Vec<ShelfRow> = self
            .shelves()
            .into_iter()
            .map(|s| self.shelf_row(s, today))
            .collect();

        let create_shelf = self.channel(MutationKind::CreateShelf, &ChannelScope::List);
        PantryView {
            total_items: total_items(&rows),
            categories: category_counts(&rows),
            shelves: rows,
            query: self.query.clone(),
            is_creating_shelf: create_shelf.is_some_and(MutationChannel::is_submitting),
            create_shelf_error: create_shelf.and_then(|c| last_error(c, FieldErrors::GENERAL)),
        }
    }

    fn shelf_row(&self, mut shelf: Shelf, today: NaiveDate) -> ShelfRow {
        let id = shelf.id.clone();
        let items = std::mem::take(&mut shelf.items)
            .into_iter()
            .map(|item| {
                let delete_error = self
                    .correlation
                    .error_for(MutationKind::DeleteItem, &item.id)
                    .and_then(|e| e.message_for("itemId"));
                let update_error = self
                    .correlation
                    .error_for(MutationKind::UpdateItem, &item.id)
                    .and_then(FieldErrors::first);
                ItemRow {
                    is_placeholder: item.is_optimistic,
                    is_updating: self.correlation.is_in_flight(MutationKind::UpdateItem, &item.id),
                    is_expired: item.is_expired(today),
                    is_expiring_soon: item.is_expiring_soon(today),
                    error: delete_error.or(update_error).map(str::to_string),
                    item,
                }
            })
            .collect();

        let create_item = self.channel(MutationKind::CreateItem, &ChannelScope::Shelf(id.clone()));
        ShelfRow {
            is_placeholder: shelf.is_optimistic,
            is_saving: self.correlation.is_in_flight(MutationKind::SaveShelf, &id),
            save_error: self.row_error(MutationKind::SaveShelf, &id, "shelfName"),
            delete_error: self.row_error(MutationKind::DeleteShelf, &id, "shelfId"),
            create_item_pending: create_item.is_some_and(MutationChannel::is_submitting),
            create_item_error: create_item.and_then(|c| last_error(c, FieldErrors::GENERAL)),
            items,
            shelf,
        }
    }

    fn row_error(&self, kind: MutationKind, id: &str, field: &str) -> Option<String> {
        self.correlation
            .error_for(kind, id)
            .and_then(|e| e.message_for(field))
            .map(str::to_string)
    }

    fn scope_for(&self, request: &MutationRequest) -> Result<ChannelScope, ControllerError> {
        Ok(match request {
            MutationRequest::CreateShelf | MutationRequest::DeleteShelf { .. } => ChannelScope::List,
            MutationRequest::SaveShelf { shelf_id, .. } => ChannelScope::Shelf(shelf_id.clone()),
            MutationRequest::CreateItem(draft) => ChannelScope::Shelf(draft.owner_shelf_id.clone()),
            MutationRequest::DeleteItem { item_id } => {
                let owner = self
                    .owner_of(item_id)
                    .ok_or_else(|| ControllerError::UnknownItem(item_id.clone()))?;
                ChannelScope::Shelf(owner.to_string())
            }
            MutationRequest::UpdateItem(update) => ChannelScope::Item(update.id.clone()),
        })
    }

    fn owner_of(&self, item_id: &str) -> Option<&str> {
        self.server
            .iter()
            .find(|shelf| shelf.items.iter().any(|item| item.id == item_id))
            .map(|shelf| shelf.id.as_str())
    }

    fn dispatch(&mut self, transition: &Transition) {
        match &transition.ticket.scope {
            ChannelScope::List => {
                self.shelves.on_transition(transition);
            }
            ChannelScope::Shelf(shelf_id) => {
                self.items
                    .entry(shelf_id.clone())
                    .or_default()
                    .on_transition(transition);
            }
            ChannelScope::Item(_) => {}
        }
        self.correlation.on_transition(transition);
        self.revision += 1;
    }
}

/// Client-assigned id a request would act on, if any
fn placeholder_target(request: &MutationRequest) -> Option<&str> {
    let target = match request {
        MutationRequest::CreateItem(draft) => Some(draft.owner_shelf_id.as_str()),
        other => other.target_id(),
    };
    target.filter(|id| is_temp_id(id))
}

/// Error of the channel's last submission, if it failed
fn last_error(channel: &MutationChannel, field: &str) -> Option<String> {
    if channel.is_submitting() {
        return None;
    }
    channel
        .last_result()
        .and_then(Resolution::errors)
        .and_then(|e| e.message_for(field).map(str::to_string))
}
