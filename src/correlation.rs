//! Correlation Map
//!
//! Which row a channel is working on, and which row a failed submission
//! belongs to, keyed by `(kind, target id)`.

use std::collections::HashMap;

use crate::channel::{Phase, Ticket, Transition};
use crate::commands::MutationKind;
use crate::models::FieldErrors;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub kind: MutationKind,
    pub target: String,
}

impl RowKey {
    pub fn new(kind: MutationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationMap {
    in_flight: HashMap<RowKey, Ticket>,
    failures: HashMap<RowKey, FieldErrors>,
}

impl CorrelationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a transition. Creates have no target row and are ignored.
    pub fn on_transition(&mut self, transition: &Transition) {
        let Some(target) = transition.request.target_id() else {
            return;
        };
        let key = RowKey::new(transition.kind(), target);

        match &transition.phase {
            Phase::Began => {
                self.failures.remove(&key);
                self.in_flight.insert(key, transition.ticket.clone());
            }
            Phase::Resolved(resolution) => {
                if self.in_flight.get(&key) == Some(&transition.ticket) {
                    self.in_flight.remove(&key);
                }
                match resolution.errors() {
                    Some(errors) => {
                        self.failures.insert(key, errors);
                    }
                    None => {
                        self.failures.remove(&key);
                    }
                }
            }
        }
    }

    pub fn is_in_flight(&self, kind: MutationKind, target: &str) -> bool {
        self.in_flight.contains_key(&RowKey::new(kind, target))
    }

    pub fn error_for(&self, kind: MutationKind, target: &str) -> Option<&FieldErrors> {
        self.failures.get(&RowKey::new(kind, target))
    }

    /// Forget failures for rows that no longer exist
    pub fn retain_targets(&mut self, keep: impl Fn(&str) -> bool) {
        self.failures.retain(|key, _| keep(key.target.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelScope, MutationChannel, Resolution};
    use crate::commands::MutationRequest;

    fn delete_item(id: &str) -> MutationRequest {
        MutationRequest::DeleteItem {
            item_id: id.to_string(),
        }
    }

    #[test]
    fn test_only_the_targeted_row_is_in_flight() {
        let mut map = CorrelationMap::new();
        let mut channel =
            MutationChannel::new(MutationKind::DeleteItem, ChannelScope::Shelf("s1".into()));
        let began = channel.begin(delete_item("i1")).unwrap();
        map.on_transition(&began);

        assert!(map.is_in_flight(MutationKind::DeleteItem, "i1"));
        assert!(!map.is_in_flight(MutationKind::DeleteItem, "i2"));
        assert!(!map.is_in_flight(MutationKind::UpdateItem, "i1"));
    }

    #[test]
    fn test_failure_is_attached_to_the_row() {
        let mut map = CorrelationMap::new();
        let mut channel =
            MutationChannel::new(MutationKind::DeleteItem, ChannelScope::Shelf("s1".into()));
        let began = channel.begin(delete_item("i1")).unwrap();
        map.on_transition(&began);
        let resolved = channel
            .resolve(
                &began.ticket,
                Resolution::Rejected(FieldErrors::general("Record not found")),
            )
            .unwrap();
        map.on_transition(&resolved);

        assert!(!map.is_in_flight(MutationKind::DeleteItem, "i1"));
        assert_eq!(
            map.error_for(MutationKind::DeleteItem, "i1")
                .and_then(|e| e.get("general")),
            Some("Record not found")
        );

        // Retrying clears the old error
        let retry = channel.begin(delete_item("i1")).unwrap();
        map.on_transition(&retry);
        assert!(map.error_for(MutationKind::DeleteItem, "i1").is_none());
    }

    #[test]
    fn test_retain_targets() {
        let mut map = CorrelationMap::new();
        let mut channel =
            MutationChannel::new(MutationKind::DeleteItem, ChannelScope::Shelf("s1".into()));
        let began = channel.begin(delete_item("gone")).unwrap();
        map.on_transition(&began);
        let resolved = channel
            .resolve(&began.ticket, Resolution::Aborted("x".into()))
            .unwrap();
        map.on_transition(&resolved);

        map.retain_targets(|id| id != "gone");
        assert!(map.error_for(MutationKind::DeleteItem, "gone").is_none());
    }
}
