//! Provenance Test Utilities
//!
//! Centralized test infrastructure for the provenance workspace:
//! - Proptest generators for ids, payloads and events
//! - Test fixtures for common research-thread scenarios
//! - Custom assertions for store-specific validation
//! - Tracing setup for tests

// Re-export the store under test
pub use provenance_store::{decode_archive, EventArchive, EventStore, SubjectStats};

// Re-export core types for convenience
pub use provenance_core::{
    ArtifactKind, ConfigError, DecodeError, EntityCategory, Event, EventId, EventLog, EventLogExt,
    Payload, ProvenanceError, ProvenanceResult, Sequence, StorageError, StoreConfig, Timestamp,
    compute_content_hash,
};

use chrono::Utc;
use uuid::Uuid;

// ============================================================================
// TRACING
// ============================================================================

/// Install a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to debug output for the store. Safe to call
/// from every test; only the first call installs anything.
pub fn init_test_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("provenance_store=debug,warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating provenance types.

    use super::*;
    use proptest::prelude::*;

    // === Identity Generators ===

    /// Generate a random UUID.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a random EventId.
    pub fn arb_event_id() -> impl Strategy<Value = EventId> {
        arb_uuid().prop_map(EventId::from_uuid)
    }

    /// Generate a Timestamp with sub-second precision.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // Generate timestamps within a reasonable range (2020-2030)
        (1577836800i64..1893456000i64, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
            chrono::DateTime::from_timestamp(secs, nanos).unwrap_or_else(Utc::now)
        })
    }

    // === Field Generators ===

    /// Generate short free text.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,.%'-]{1,32}"
    }

    /// Generate an opaque reference like `msg-42`.
    pub fn arb_ref() -> impl Strategy<Value = String> {
        "(msg|conv|ins|dec|snap)-[0-9]{1,4}"
    }

    /// Generate an artifact URI from a small pool so URIs repeat.
    pub fn arb_uri() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "arxiv:2401.00001",
            "arxiv:2402.12345",
            "doi:10.1000/xyz123",
            "github:example/decoder",
            "https://example.org/dataset",
        ])
        .prop_map(str::to_string)
    }

    /// Generate a subject from a small pool so subjects share events.
    pub fn arb_subject() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["conv-a", "conv-b", "conv-c"]).prop_map(str::to_string)
    }

    /// Generate an actor from a small pool.
    pub fn arb_actor() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["alice", "bob", "assistant"]).prop_map(str::to_string)
    }

    /// Generate an optional correlation id.
    pub fn arb_correlation() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(vec!["op-1", "op-2"]).prop_map(str::to_string))
    }

    /// Generate a confidence score with two decimals.
    pub fn arb_confidence() -> impl Strategy<Value = Option<f64>> {
        prop::option::of((0u32..=100).prop_map(|n| f64::from(n) / 100.0))
    }

    fn arb_opt_text() -> impl Strategy<Value = Option<String>> {
        prop::option::of(arb_text())
    }

    fn arb_text_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(arb_ref(), 0..4)
    }

    // === Payload Generators ===

    /// Generate a conversation lifecycle payload.
    pub fn arb_conversation_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            (arb_text(), prop::collection::vec(arb_actor(), 0..3)).prop_map(
                |(title, participants)| Payload::ConversationCreated {
                    title,
                    participants
                }
            ),
            (arb_ref(), arb_text(), arb_text()).prop_map(|(from_ref, reason, new_title)| {
                Payload::ConversationBranched {
                    from_ref,
                    reason,
                    new_title,
                }
            }),
            arb_opt_text().prop_map(|reason| Payload::ConversationArchived { reason }),
            Just(Payload::ConversationUnarchived),
            (arb_text(), arb_text()).prop_map(|(old_title, new_title)| {
                Payload::ConversationTitleUpdated {
                    old_title,
                    new_title,
                }
            }),
            arb_text().prop_map(|summary| Payload::ConversationSummarized { summary }),
        ]
    }

    /// Generate a message payload.
    pub fn arb_message_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            (
                arb_ref(),
                prop::sample::select(vec!["user", "assistant", "system"]),
                arb_opt_text(),
                "[0-9a-f]{64}"
            )
                .prop_map(|(message_ref, role, model_used, content_hash)| {
                    Payload::MessageSent {
                        message_ref,
                        role: role.to_string(),
                        model_used,
                        content_hash,
                    }
                }),
            (arb_ref(), "[0-9a-f]{64}", "[0-9a-f]{64}", arb_opt_text()).prop_map(
                |(message_ref, old_hash, new_hash, reason)| Payload::MessageEdited {
                    message_ref,
                    old_hash,
                    new_hash,
                    reason,
                }
            ),
            (arb_ref(), arb_ref(), arb_text()).prop_map(|(side_ref, synthesis_ref, summary)| {
                Payload::SideConversationSynthesized {
                    side_ref,
                    synthesis_ref,
                    summary,
                }
            }),
        ]
    }

    /// Generate an artifact payload.
    pub fn arb_artifact_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            (
                arb_uri(),
                prop::sample::select(vec!["paper", "dataset", "repository", "document"]),
                arb_opt_text(),
                arb_text()
            )
                .prop_map(|(uri, kind, version, display_name)| {
                    Payload::ArtifactIntroduced {
                        uri,
                        kind: kind.to_string(),
                        version,
                        display_name,
                    }
                }),
            (arb_uri(), arb_ref(), arb_text()).prop_map(|(uri, message_ref, context_snippet)| {
                Payload::ArtifactReferenced {
                    uri,
                    message_ref,
                    context_snippet,
                }
            }),
            (arb_uri(), arb_text(), arb_opt_text(), arb_opt_text()).prop_map(
                |(uri, field, old_value, new_value)| Payload::ArtifactMetadataUpdated {
                    uri,
                    field,
                    old_value,
                    new_value,
                }
            ),
            (arb_uri(), arb_text())
                .prop_map(|(uri, details)| Payload::ArtifactResolved { uri, details }),
            (arb_uri(), arb_uri(), arb_text()).prop_map(
                |(source_uri, target_uri, relationship)| Payload::ArtifactLinked {
                    source_uri,
                    target_uri,
                    relationship,
                }
            ),
        ]
    }

    /// Generate an insight or decision payload.
    pub fn arb_reasoning_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            (arb_ref(), arb_text(), arb_text_list(), arb_confidence()).prop_map(
                |(insight_ref, summary, derived_from, confidence)| Payload::InsightRecorded {
                    insight_ref,
                    summary,
                    derived_from,
                    confidence,
                }
            ),
            (arb_ref(), arb_text(), arb_text(), arb_text_list()).prop_map(
                |(decision_ref, description, rationale, alternatives)| Payload::DecisionMade {
                    decision_ref,
                    description,
                    rationale,
                    alternatives,
                }
            ),
            (arb_ref(), arb_text(), arb_text(), arb_text()).prop_map(
                |(decision_ref, old_description, new_description, reason)| {
                    Payload::DecisionRevised {
                        decision_ref,
                        old_description,
                        new_description,
                        reason,
                    }
                }
            ),
        ]
    }

    /// Generate a system payload.
    pub fn arb_system_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            arb_opt_text().prop_map(|reason| Payload::SystemPaused { reason }),
            Just(Payload::SystemResumed),
            (arb_ref(), prop::sample::select(vec!["json", "markdown"])).prop_map(
                |(snapshot_ref, format)| Payload::SnapshotCreated {
                    snapshot_ref,
                    format: format.to_string(),
                }
            ),
            (arb_ref(), arb_text(), arb_text()).prop_map(|(export_ref, format, destination)| {
                Payload::Exported {
                    export_ref,
                    format,
                    destination,
                }
            }),
            (arb_ref(), arb_text(), prop::option::of(arb_ref())).prop_map(
                |(import_ref, source, original_subject_ref)| Payload::Imported {
                    import_ref,
                    source,
                    original_subject_ref,
                }
            ),
        ]
    }

    /// Generate any payload variant.
    pub fn arb_payload() -> impl Strategy<Value = Payload> {
        prop_oneof![
            arb_conversation_payload(),
            arb_message_payload(),
            arb_artifact_payload(),
            arb_reasoning_payload(),
            arb_system_payload(),
        ]
    }

    // === Event Generators ===

    /// Generate a pending (unrecorded) event without causation.
    pub fn arb_pending_event() -> impl Strategy<Value = Event> {
        (
            arb_subject(),
            arb_actor(),
            arb_payload(),
            arb_correlation(),
            arb_timestamp(),
        )
            .prop_map(|(subject, actor, payload, correlation, timestamp)| {
                let event = Event::new(subject, actor, payload).with_timestamp(timestamp);
                match correlation {
                    Some(correlation) => event.with_correlation(correlation),
                    None => event,
                }
            })
    }

    /// Generate a batch of pending events.
    pub fn arb_event_batch(max: usize) -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec(arb_pending_event(), 0..max)
    }

    /// Generate a linear causal chain: each event is caused by the previous.
    pub fn arb_causal_chain(max: usize) -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec(arb_pending_event(), 1..max.max(2)).prop_map(|events| {
            let mut chain: Vec<Event> = Vec::with_capacity(events.len());
            for event in events {
                let event = match chain.last() {
                    Some(previous) => event.with_causation(previous.id),
                    None => event,
                };
                chain.push(event);
            }
            chain
        })
    }

    /// Generate a valid store configuration.
    pub fn arb_valid_config() -> impl Strategy<Value = StoreConfig> {
        (1usize..4096, prop::option::of(1usize..64), any::<bool>()).prop_map(
            |(initial_capacity, lineage_depth_limit, export_pretty)| StoreConfig {
                initial_capacity,
                lineage_depth_limit,
                export_pretty,
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Create a minimal valid StoreConfig for testing.
    pub fn minimal_config() -> StoreConfig {
        StoreConfig {
            initial_capacity: 16,
            lineage_depth_limit: None,
            export_pretty: false,
        }
    }

    /// A pending `MessageSent` event.
    pub fn message_sent(subject: &str, actor: &str, n: u32) -> Event {
        Event::new(
            subject,
            actor,
            Payload::MessageSent {
                message_ref: format!("msg-{n}"),
                role: "user".to_string(),
                model_used: None,
                content_hash: compute_content_hash(format!("message {n}").as_bytes()),
            },
        )
    }

    /// A pending `ArtifactIntroduced` event for a paper.
    pub fn paper_introduced(subject: &str, uri: &str) -> Event {
        Event::new(
            subject,
            "alice",
            Payload::ArtifactIntroduced {
                uri: uri.to_string(),
                kind: ArtifactKind::Paper.to_string(),
                version: None,
                display_name: format!("Paper {uri}"),
            },
        )
    }

    /// Events recorded by [`research_thread`].
    #[derive(Debug, Clone)]
    pub struct ResearchThread {
        pub created: Event,
        pub question: Event,
        pub paper: Event,
        pub answer: Event,
        pub insight: Event,
        pub decision: Event,
    }

    /// Subject used by [`research_thread`].
    pub const RESEARCH_SUBJECT: &str = "conv-surface-codes";

    /// Record a small research conversation into `store`.
    ///
    /// The question, answer, insight and decision form one causal chain; the
    /// answer and paper share the correlation id `turn-1`.
    pub fn research_thread(store: &EventStore) -> ProvenanceResult<ResearchThread> {
        let created = store.record_conversation_created(
            RESEARCH_SUBJECT,
            "alice",
            "Surface code thresholds",
            vec!["alice".to_string(), "assistant".to_string()],
        )?;
        let question = store.record_message_sent(
            RESEARCH_SUBJECT,
            "alice",
            "msg-1",
            "user",
            None,
            compute_content_hash(b"What is the threshold?"),
            Some(created.id),
        )?;
        let paper = store.record(
            paper_introduced(RESEARCH_SUBJECT, "arxiv:1208.0928").with_correlation("turn-1"),
        )?;
        let answer = store.record(
            Event::new(
                RESEARCH_SUBJECT,
                "assistant",
                Payload::MessageSent {
                    message_ref: "msg-2".to_string(),
                    role: "assistant".to_string(),
                    model_used: Some("research-model".to_string()),
                    content_hash: compute_content_hash(b"Roughly one percent."),
                },
            )
            .with_causation(question.id)
            .with_correlation("turn-1"),
        )?;
        let insight = store.record(
            Event::new(
                RESEARCH_SUBJECT,
                "assistant",
                Payload::InsightRecorded {
                    insight_ref: "ins-1".to_string(),
                    summary: "Threshold is near 1%".to_string(),
                    derived_from: vec!["msg-2".to_string(), "arxiv:1208.0928".to_string()],
                    confidence: Some(0.9),
                },
            )
            .with_causation(answer.id),
        )?;
        let decision = store.record(
            Event::new(
                RESEARCH_SUBJECT,
                "alice",
                Payload::DecisionMade {
                    decision_ref: "dec-1".to_string(),
                    description: "Target physical error rate 0.1%".to_string(),
                    rationale: "Order of magnitude below threshold".to_string(),
                    alternatives: vec!["0.5%".to_string()],
                },
            )
            .with_causation(insight.id),
        )?;

        Ok(ResearchThread {
            created,
            question,
            paper,
            answer,
            insight,
            decision,
        })
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for provenance-specific validation.

    use super::*;

    /// Assert that a ProvenanceResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &ProvenanceResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a ProvenanceResult is a Decode error.
    #[track_caller]
    pub fn assert_decode_error<T: std::fmt::Debug>(result: &ProvenanceResult<T>) {
        match result {
            Err(ProvenanceError::Decode(_)) => {}
            other => panic!("Expected Decode error, got: {:?}", other),
        }
    }

    /// Assert that a ProvenanceResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &ProvenanceResult<T>) {
        match result {
            Err(ProvenanceError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that the store's indices agree with its log.
    #[track_caller]
    pub fn assert_index_consistent(store: &EventStore) {
        if let Err(e) = store.check_consistency() {
            panic!("Store indices inconsistent: {:?}", e);
        }
    }

    /// Assert that sequences increase by exactly one from the first event.
    #[track_caller]
    pub fn assert_gap_free(events: &[Event]) {
        let Some(first) = events.first() else {
            return;
        };
        for (offset, event) in events.iter().enumerate() {
            assert_eq!(
                event.sequence,
                first.sequence + offset as Sequence,
                "Sequence gap at offset {}",
                offset
            );
        }
    }

    /// Assert that two events carry the same provenance, ignoring sequence.
    #[track_caller]
    pub fn assert_same_provenance(expected: &Event, actual: &Event) {
        assert_eq!(expected.id, actual.id, "Event id mismatch");
        assert_eq!(expected.timestamp, actual.timestamp, "Timestamp mismatch");
        assert_eq!(expected.subject, actual.subject, "Subject mismatch");
        assert_eq!(expected.actor, actual.actor, "Actor mismatch");
        assert_eq!(expected.payload, actual.payload, "Payload mismatch");
        assert_eq!(expected.correlation, actual.correlation, "Correlation mismatch");
        assert_eq!(expected.causation, actual.causation, "Causation mismatch");
    }

    /// Assert that events have exactly the given ids, in order.
    #[track_caller]
    pub fn assert_event_ids(events: &[Event], expected: &[EventId]) {
        let actual: Vec<EventId> = events.iter().map(|e| e.id).collect();
        assert_eq!(actual, expected, "Event id order mismatch");
    }
}

// ============================================================================
// TESTS
// ============================================================================
