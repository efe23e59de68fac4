//! Causal lineage queries.
//!
//! Causation links point backwards: each event names at most one prior event
//! that caused it. Walking those links from an event yields its lineage;
//! scanning for events that name a given id yields its direct effects.

use crate::state::LogState;
use crate::EventStore;
use provenance_core::{Event, EventId, ProvenanceResult};
use std::collections::HashSet;
use tracing::{debug, warn};

impl LogState {
    /// Backward walk over causation links, newest first.
    ///
    /// Stops at a dangling reference, at an id already visited, or once
    /// `depth_limit` events have been collected.
    pub(crate) fn lineage(&self, from: EventId, depth_limit: Option<usize>) -> Vec<Event> {
        // Without cycles a walk can never be longer than the log itself.
        let bound = self.len() + 1;
        let limit = depth_limit.map_or(bound, |limit| limit.min(bound));

        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(from);

        while let Some(id) = current {
            if !visited.insert(id) {
                warn!(event_id = %id, start = %from, "Causation cycle detected during lineage walk");
                break;
            }
            let Some(event) = self.get(id) else {
                if !chain.is_empty() {
                    debug!(event_id = %id, start = %from, "Lineage stops at dangling causation reference");
                }
                break;
            };
            if chain.len() >= limit {
                warn!(limit, start = %from, "Lineage walk truncated at depth limit");
                break;
            }
            chain.push(event.clone());
            current = event.causation;
        }

        chain
    }

    /// Events whose causation is exactly `of`, in append order.
    pub(crate) fn effects(&self, of: EventId) -> Vec<Event> {
        self.events()
            .iter()
            .filter(|e| e.causation == Some(of))
            .cloned()
            .collect()
    }
}

impl EventStore {
    /// Causal chain leading to an event, starting with the event itself.
    ///
    /// Returns `[C, B, A]` for `A -> B -> C`. A missing starting event yields
    /// an empty chain; a dangling reference ends the chain early.
    pub fn trace_lineage(&self, from: EventId) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state.lineage(from, self.config().lineage_depth_limit))
    }

    /// Events directly caused by `of`, in ascending sequence.
    ///
    /// Only direct children are returned; call again on each child for the
    /// transitive closure.
    pub fn trace_effects(&self, of: EventId) -> ProvenanceResult<Vec<Event>> {
        Ok(self.read_state()?.effects(of))
    }

    /// Earliest event reachable through causation links from `from`.
    ///
    /// Ignores `lineage_depth_limit`; only the cycle guard bounds the walk.
    pub fn root_cause(&self, from: EventId) -> ProvenanceResult<Option<Event>> {
        Ok(self.read_state()?.lineage(from, None).pop())
    }

    /// Whether `ancestor` is reachable from `event` through causation links.
    ///
    /// Transitive, unlike [`Event::is_caused_by`]. An event counts as its own
    /// ancestor. Ignores `lineage_depth_limit`.
    pub fn has_ancestor(&self, event: EventId, ancestor: EventId) -> ProvenanceResult<bool> {
        Ok(self
            .read_state()?
            .lineage(event, None)
            .iter()
            .any(|e| e.id == ancestor))
    }
}
