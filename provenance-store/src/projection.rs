//! Read-only projections over artifacts, decisions and insights.

use crate::EventStore;
use provenance_core::{ArtifactKind, Event, Payload, ProvenanceResult};
use std::collections::HashSet;

/// URI an event brings into its subject, if any.
pub(crate) fn subject_artifact(payload: &Payload) -> Option<&str> {
    match payload {
        Payload::ArtifactIntroduced { uri, .. } | Payload::ArtifactReferenced { uri, .. } => {
            Some(uri.as_str())
        }
        _ => None,
    }
}

impl EventStore {
    /// Every event that touches an artifact URI, across all subjects.
    ///
    /// Covers introduction, references, metadata updates, resolution, and
    /// links where the URI is either endpoint. Matching is exact.
    pub fn artifact_history(&self, uri: &str) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events()
            .iter()
            .filter(|e| e.payload.references_artifact(uri))
            .cloned()
            .collect())
    }

    /// Artifact URIs brought into a subject, deduplicated in first-seen order.
    ///
    /// Introductions and references both count. Links, metadata updates and
    /// resolutions do not.
    pub fn artifacts_in_subject(&self, subject: &str) -> ProvenanceResult<Vec<String>> {
        let state = self.read_state()?;
        let mut seen = HashSet::new();
        let mut uris = Vec::new();
        for event in state.for_subject(subject) {
            if let Some(uri) = subject_artifact(&event.payload) {
                if seen.insert(uri) {
                    uris.push(uri.to_string());
                }
            }
        }
        Ok(uris)
    }

    /// URIs introduced in a subject as the given kind, in first-seen order.
    ///
    /// Kind strings are parsed leniently, so `"repo"` matches
    /// [`ArtifactKind::Repository`].
    pub fn artifacts_of_kind(
        &self,
        subject: &str,
        kind: ArtifactKind,
    ) -> ProvenanceResult<Vec<String>> {
        let state = self.read_state()?;
        let mut seen = HashSet::new();
        let mut uris = Vec::new();
        for event in state.for_subject(subject) {
            if event.payload.artifact_kind() != Some(kind) {
                continue;
            }
            if let Payload::ArtifactIntroduced { uri, .. } = &event.payload {
                if seen.insert(uri.as_str()) {
                    uris.push(uri.clone());
                }
            }
        }
        Ok(uris)
    }

    /// Decisions made or revised in a subject.
    pub fn decisions_in_subject(&self, subject: &str) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .for_subject(subject)
            .filter(|e| e.payload.decision_ref().is_some())
            .cloned()
            .collect())
    }

    /// The decision and every revision of it, wherever they were recorded.
    pub fn decision_history(&self, decision_ref: &str) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events()
            .iter()
            .filter(|e| e.payload.decision_ref() == Some(decision_ref))
            .cloned()
            .collect())
    }

    pub fn insights_in_subject(&self, subject: &str) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .for_subject(subject)
            .filter(|e| matches!(e.payload, Payload::InsightRecorded { .. }))
            .cloned()
            .collect())
    }

    /// Insights whose sources include `source_ref`, across all subjects.
    pub fn insights_derived_from(&self, source_ref: &str) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .events()
            .iter()
            .filter(|e| match &e.payload {
                Payload::InsightRecorded { derived_from, .. } => {
                    derived_from.iter().any(|source| source == source_ref)
                }
                _ => false,
            })
            .cloned()
            .collect())
    }
}
