//! Per-subject summary statistics.

use crate::projection::subject_artifact;
use crate::EventStore;
use provenance_core::{EntityCategory, Payload, ProvenanceResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Summary counts for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub total_events: usize,
    /// `MessageSent` events (edits are not counted)
    pub message_count: usize,
    /// Distinct artifact URIs introduced or referenced
    pub artifact_count: usize,
    /// `DecisionMade` events (revisions are not counted)
    pub decision_count: usize,
    pub insight_count: usize,
    /// Distinct actors
    pub actor_count: usize,
    /// `ConversationBranched` events
    pub branch_count: usize,
}

impl EventStore {
    /// Compute summary statistics for a subject in one pass.
    pub fn stats(&self, subject: &str) -> ProvenanceResult<SubjectStats> {
        let state = self.read_state()?;
        let mut stats = SubjectStats::default();
        let mut artifacts = HashSet::new();
        let mut actors = HashSet::new();

        for event in state.for_subject(subject) {
            stats.total_events += 1;
            actors.insert(event.actor.as_str());
            if let Some(uri) = subject_artifact(&event.payload) {
                artifacts.insert(uri);
            }
            match &event.payload {
                Payload::MessageSent { .. } => stats.message_count += 1,
                Payload::DecisionMade { .. } => stats.decision_count += 1,
                Payload::InsightRecorded { .. } => stats.insight_count += 1,
                Payload::ConversationBranched { .. } => stats.branch_count += 1,
                _ => {}
            }
        }

        stats.artifact_count = artifacts.len();
        stats.actor_count = actors.len();
        Ok(stats)
    }

    /// Number of events per category in a subject.
    ///
    /// Categories with no events are omitted.
    pub fn category_counts(
        &self,
        subject: &str,
    ) -> ProvenanceResult<BTreeMap<EntityCategory, usize>> {
        let state = self.read_state()?;
        let mut counts = BTreeMap::new();
        for event in state.for_subject(subject) {
            *counts.entry(event.category()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_core::{Event, EventLog, EventLogExt};

    #[test]
    fn test_stats_for_unknown_subject_is_zero() {
        let store = EventStore::new();
        assert_eq!(store.stats("nobody").unwrap(), SubjectStats::default());
        assert!(store.category_counts("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_stats_counts() {
        let store = EventStore::new();
        store
            .record_conversation_created("conv-1", "alice", "Decoders", vec!["alice".into()])
            .unwrap();
        let m1 = store
            .record_message_sent("conv-1", "alice", "m-1", "user", None, "h1", None)
            .unwrap();
        store
            .record_message_sent("conv-1", "bot", "m-2", "assistant", None, "h2", Some(m1.id))
            .unwrap();
        store
            .record_message_edited("conv-1", "alice", "m-1", "h1", "h1b", None)
            .unwrap();
        for uri in ["arxiv:1", "arxiv:2", "arxiv:1"] {
            store
                .record_artifact_introduced("conv-1", "alice", uri, "paper", None, uri)
                .unwrap();
        }
        store
            .record_artifact_referenced("conv-1", "bot", "arxiv:2", "m-2", "as shown")
            .unwrap();
        store
            .record_decision("conv-1", "alice", "d-1", "Go", "why not", vec![])
            .unwrap();
        store
            .record_decision_revised("conv-1", "alice", "d-1", "Go", "Stop", "changed mind")
            .unwrap();
        store
            .record_insight("conv-1", "bot", "i-1", "Works", vec![], None)
            .unwrap();
        store
            .record_conversation_branched("conv-1", "carol", "conv-0", "fork", "Fork")
            .unwrap();
        store
            .record(Event::new("conv-2", "dave", Payload::SystemResumed))
            .unwrap();

        let stats = store.stats("conv-1").unwrap();
        assert_eq!(
            stats,
            SubjectStats {
                total_events: 12,
                message_count: 2,
                artifact_count: 2,
                decision_count: 1,
                insight_count: 1,
                actor_count: 3,
                branch_count: 1,
            }
        );

        let counts = store.category_counts("conv-1").unwrap();
        assert_eq!(counts.get(&EntityCategory::Conversation), Some(&2));
        assert_eq!(counts.get(&EntityCategory::Message), Some(&3));
        assert_eq!(counts.get(&EntityCategory::Artifact), Some(&4));
        assert_eq!(counts.get(&EntityCategory::Decision), Some(&2));
        assert_eq!(counts.get(&EntityCategory::Insight), Some(&1));
        assert_eq!(counts.get(&EntityCategory::System), None);
        assert_eq!(counts.values().sum::<usize>(), stats.total_events);
    }
}
