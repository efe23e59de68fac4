//! Event log trait for append-only provenance storage.
//!
//! The log is a single totally-ordered sequence of events. Implementations
//! assign sequences on append and keep lookup indices consistent with the
//! log; everything else is derived by reading.

use crate::{Event, EventId, Payload, ProvenanceResult, Sequence};

/// Trait for append-only event log operations.
///
/// Implementations must serialize appends: concurrent callers of
/// [`EventLog::record`] observe strictly increasing, gap-free sequences
/// starting at 1.
pub trait EventLog: Send + Sync {
    /// Append an event.
    ///
    /// The event's sequence is overwritten with the next sequence number.
    /// Returns the stored event.
    ///
    /// # Errors
    ///
    /// Only fails if the underlying storage is unusable (e.g. a poisoned lock).
    fn record(&self, event: Event) -> ProvenanceResult<Event>;

    /// Sequence of the most recently appended event (0 when empty).
    fn current_sequence(&self) -> ProvenanceResult<Sequence>;

    /// Look up an event by id.
    fn get_event(&self, id: EventId) -> ProvenanceResult<Option<Event>>;

    /// All events for a subject, in append order.
    fn events_for_subject(&self, subject: &str) -> ProvenanceResult<Vec<Event>>;

    /// All events with a sequence strictly greater than `sequence`, in order.
    ///
    /// Used for incremental sync and tailing.
    fn events_after(&self, sequence: Sequence) -> ProvenanceResult<Vec<Event>>;

    /// All events sharing a correlation id, in append order.
    fn events_by_correlation(&self, correlation: &str) -> ProvenanceResult<Vec<Event>>;

    /// All events triggered by an actor, in append order.
    fn events_by_actor(&self, actor: &str) -> ProvenanceResult<Vec<Event>>;
}

/// Extension trait with convenience recorders.
///
/// Each recorder builds one payload variant and passes it through
/// [`EventLog::record`]. Implementors get these for free.
pub trait EventLogExt: EventLog {
    /// Record the creation of a conversation.
    fn record_conversation_created(
        &self,
        subject: &str,
        actor: &str,
        title: impl Into<String>,
        participants: Vec<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::ConversationCreated {
                title: title.into(),
                participants,
            },
        ))
    }

    /// Record that `subject` was branched off `from_ref`.
    fn record_conversation_branched(
        &self,
        subject: &str,
        actor: &str,
        from_ref: impl Into<String>,
        reason: impl Into<String>,
        new_title: impl Into<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::ConversationBranched {
                from_ref: from_ref.into(),
                reason: reason.into(),
                new_title: new_title.into(),
            },
        ))
    }

    /// Record a sent message.
    ///
    /// When `caused_by` is given the message is linked to that prior event;
    /// this is how causal chains are normally formed.
    #[allow(clippy::too_many_arguments)]
    fn record_message_sent(
        &self,
        subject: &str,
        actor: &str,
        message_ref: impl Into<String>,
        role: impl Into<String>,
        model_used: Option<String>,
        content_hash: impl Into<String>,
        caused_by: Option<EventId>,
    ) -> ProvenanceResult<Event> {
        let mut event = Event::new(
            subject,
            actor,
            Payload::MessageSent {
                message_ref: message_ref.into(),
                role: role.into(),
                model_used,
                content_hash: content_hash.into(),
            },
        );
        if let Some(cause) = caused_by {
            event = event.with_causation(cause);
        }
        self.record(event)
    }

    /// Record an edit to an existing message.
    fn record_message_edited(
        &self,
        subject: &str,
        actor: &str,
        message_ref: impl Into<String>,
        old_hash: impl Into<String>,
        new_hash: impl Into<String>,
        reason: Option<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::MessageEdited {
                message_ref: message_ref.into(),
                old_hash: old_hash.into(),
                new_hash: new_hash.into(),
                reason,
            },
        ))
    }

    /// Record the first introduction of an artifact.
    fn record_artifact_introduced(
        &self,
        subject: &str,
        actor: &str,
        uri: impl Into<String>,
        kind: impl Into<String>,
        version: Option<String>,
        display_name: impl Into<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::ArtifactIntroduced {
                uri: uri.into(),
                kind: kind.into(),
                version,
                display_name: display_name.into(),
            },
        ))
    }

    /// Record a reference to an artifact from a message.
    fn record_artifact_referenced(
        &self,
        subject: &str,
        actor: &str,
        uri: impl Into<String>,
        message_ref: impl Into<String>,
        context_snippet: impl Into<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::ArtifactReferenced {
                uri: uri.into(),
                message_ref: message_ref.into(),
                context_snippet: context_snippet.into(),
            },
        ))
    }

    /// Record a relationship between two artifacts.
    fn record_artifact_linked(
        &self,
        subject: &str,
        actor: &str,
        source_uri: impl Into<String>,
        target_uri: impl Into<String>,
        relationship: impl Into<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::ArtifactLinked {
                source_uri: source_uri.into(),
                target_uri: target_uri.into(),
                relationship: relationship.into(),
            },
        ))
    }

    /// Record an insight.
    #[allow(clippy::too_many_arguments)]
    fn record_insight(
        &self,
        subject: &str,
        actor: &str,
        insight_ref: impl Into<String>,
        summary: impl Into<String>,
        derived_from: Vec<String>,
        confidence: Option<f64>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::InsightRecorded {
                insight_ref: insight_ref.into(),
                summary: summary.into(),
                derived_from,
                confidence,
            },
        ))
    }

    /// Record a decision.
    fn record_decision(
        &self,
        subject: &str,
        actor: &str,
        decision_ref: impl Into<String>,
        description: impl Into<String>,
        rationale: impl Into<String>,
        alternatives: Vec<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::DecisionMade {
                decision_ref: decision_ref.into(),
                description: description.into(),
                rationale: rationale.into(),
                alternatives,
            },
        ))
    }

    /// Record a revision of an earlier decision.
    ///
    /// The revision may live in a different subject than the original.
    #[allow(clippy::too_many_arguments)]
    fn record_decision_revised(
        &self,
        subject: &str,
        actor: &str,
        decision_ref: impl Into<String>,
        old_description: impl Into<String>,
        new_description: impl Into<String>,
        reason: impl Into<String>,
    ) -> ProvenanceResult<Event> {
        self.record(Event::new(
            subject,
            actor,
            Payload::DecisionRevised {
                decision_ref: decision_ref.into(),
                old_description: old_description.into(),
                new_description: new_description.into(),
                reason: reason.into(),
            },
        ))
    }
}

// Blanket implementation: any EventLog automatically gets EventLogExt
impl<T: EventLog + ?Sized> EventLogExt for T {}
