//! The provenance event envelope.
//!
//! An [`Event`] wraps one [`Payload`] with the metadata needed to order it
//! and to place it in the causal graph:
//!
//! ```text
//!   A ──causation── B ──causation── C        (lineage of C: C, B, A)
//!   └──────── correlation "op-7" ────────┘   (grouping, no causal claim)
//! ```
//!
//! Before it is recorded an event is an ordinary value carrying the pending
//! sequence 0. The store assigns the real sequence on append; after that the
//! stored copy never changes.

use crate::{EntityCategory, EventId, Payload, Sequence, Timestamp, PENDING_SEQUENCE};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A provenance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Event {
    /// Unique event id
    pub id: EventId,
    /// Append position, assigned by the store (0 while pending)
    pub sequence: Sequence,
    /// When the event happened
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
    /// Conversation or thread the event belongs to
    pub subject: String,
    pub payload: Payload,
    /// User or agent that triggered the event
    pub actor: String,
    /// Groups events belonging to one logical operation
    pub correlation: Option<String>,
    /// The prior event that directly caused this one
    pub causation: Option<EventId>,
}

impl Event {
    /// Create a pending event stamped with the current time.
    pub fn new(subject: impl Into<String>, actor: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: EventId::new(),
            sequence: PENDING_SEQUENCE,
            timestamp: Utc::now(),
            subject: subject.into(),
            payload,
            actor: actor.into(),
            correlation: None,
            causation: None,
        }
    }

    /// Return a copy caused by the given event.
    pub fn with_causation(self, causation: EventId) -> Self {
        Self {
            causation: Some(causation),
            ..self
        }
    }

    /// Return a copy in the given correlation group.
    pub fn with_correlation(self, correlation: impl Into<String>) -> Self {
        Self {
            correlation: Some(correlation.into()),
            ..self
        }
    }

    /// Return a copy with a fixed timestamp.
    pub fn with_timestamp(self, timestamp: Timestamp) -> Self {
        Self { timestamp, ..self }
    }

    /// Whether this event has not been recorded yet.
    pub fn is_pending(&self) -> bool {
        self.sequence == PENDING_SEQUENCE
    }

    /// Entity category affected by this event.
    pub fn category(&self) -> EntityCategory {
        self.payload.category()
    }

    /// Short human-readable description derived from the payload.
    pub fn describe(&self) -> String {
        self.payload.describe()
    }

    /// Whether this event was directly caused by `id`.
    pub fn is_caused_by(&self, id: EventId) -> bool {
        self.causation == Some(id)
    }
}
