//! Mutation Channel
//!
//! One request slot per mutation kind and scope. A channel moves
//! idle -> submitting -> idle and every move is returned as a [`Transition`]
//! for the lifecycle bindings to consume.

use serde::Serialize;

use crate::commands::{EndpointError, MutationKind, MutationRequest, MutationResponse};
use crate::models::{FieldErrors, Item, Shelf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Submitting,
}

/// Where a channel lives: the whole list, one shelf card, or one item row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelScope {
    List,
    Shelf(String),
    Item(String),
}

/// Handle of one submission, needed to resolve it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub kind: MutationKind,
    pub scope: ChannelScope,
    pub seq: u64,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Shelf(Shelf),
    Item(Item),
    /// Validation, not-found or persistence error reported by the endpoint
    Rejected(FieldErrors),
    /// The call itself failed; there is no usable result
    Aborted(String),
}

impl Resolution {
    pub fn from_outcome(outcome: Result<MutationResponse, EndpointError>) -> Self {
        match outcome {
            Ok(MutationResponse::Shelf(shelf)) => Resolution::Shelf(shelf),
            Ok(MutationResponse::Item(item)) => Resolution::Item(item),
            Ok(MutationResponse::Failed { errors }) => Resolution::Rejected(errors),
            Err(e) => Resolution::Aborted(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resolution::Shelf(_) | Resolution::Item(_))
    }

    /// Errors to show next to the triggering control
    pub fn errors(&self) -> Option<FieldErrors> {
        match self {
            Resolution::Rejected(errors) if errors.is_empty() => {
                Some(FieldErrors::general("Request failed"))
            }
            Resolution::Rejected(errors) => Some(errors.clone()),
            Resolution::Aborted(message) => Some(FieldErrors::general(message.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Began,
    Resolved(Resolution),
}

/// One lifecycle move of one channel
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub ticket: Ticket,
    pub request: MutationRequest,
    pub phase: Phase,
}

impl Transition {
    pub fn kind(&self) -> MutationKind {
        self.ticket.kind
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.phase {
            Phase::Began => None,
            Phase::Resolved(resolution) => Some(resolution),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("{kind} is already submitting")]
    Busy { kind: MutationKind },
    #[error("{got} request sent to the {expected} channel")]
    KindMismatch {
        expected: MutationKind,
        got: MutationKind,
    },
    #[error("{kind} channel is not submitting")]
    NotSubmitting { kind: MutationKind },
    #[error("ticket #{seq} does not match the {kind} submission in flight")]
    StaleTicket { kind: MutationKind, seq: u64 },
}

#[derive(Debug, Clone)]
pub struct MutationChannel {
    kind: MutationKind,
    scope: ChannelScope,
    state: LifecycleState,
    submitted: Option<MutationRequest>,
    last_result: Option<Resolution>,
    seq: u64,
}

impl MutationChannel {
    pub fn new(kind: MutationKind, scope: ChannelScope) -> Self {
        Self {
            kind,
            scope,
            state: LifecycleState::Idle,
            submitted: None,
            last_result: None,
            seq: 0,
        }
    }

    /// Start a submission. A busy channel keeps its payload and refuses.
    pub fn begin(&mut self, request: MutationRequest) -> Result<Transition, ChannelError> {
        if request.kind() != self.kind {
            return Err(ChannelError::KindMismatch {
                expected: self.kind,
                got: request.kind(),
            });
        }
        if self.state == LifecycleState::Submitting {
            return Err(ChannelError::Busy { kind: self.kind });
        }

        self.seq += 1;
        self.state = LifecycleState::Submitting;
        self.submitted = Some(request.clone());
        self.last_result = None;

        Ok(Transition {
            ticket: self.ticket(),
            request,
            phase: Phase::Began,
        })
    }

    /// Finish the submission `ticket` refers to. The result is stored once.
    pub fn resolve(
        &mut self,
        ticket: &Ticket,
        resolution: Resolution,
    ) -> Result<Transition, ChannelError> {
        if self.state != LifecycleState::Submitting {
            return Err(ChannelError::NotSubmitting { kind: self.kind });
        }
        if *ticket != self.ticket() {
            return Err(ChannelError::StaleTicket {
                kind: self.kind,
                seq: ticket.seq,
            });
        }
        let request = self
            .submitted
            .clone()
            .ok_or(ChannelError::NotSubmitting { kind: self.kind })?;

        self.state = LifecycleState::Idle;
        self.last_result = Some(resolution.clone());

        Ok(Transition {
            ticket: ticket.clone(),
            request,
            phase: Phase::Resolved(resolution),
        })
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn scope(&self) -> &ChannelScope {
        &self.scope
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == LifecycleState::Submitting
    }

    /// Payload of the current or most recent submission
    pub fn submitted_payload(&self) -> Option<&MutationRequest> {
        self.submitted.as_ref()
    }

    pub fn last_result(&self) -> Option<&Resolution> {
        self.last_result.as_ref()
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            kind: self.kind,
            scope: self.scope.clone(),
            seq: self.seq,
        }
    }
}
