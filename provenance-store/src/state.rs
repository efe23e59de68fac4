//! Log state guarded by the store lock.
//!
//! The log vector is the source of truth. Every secondary index maps a key to
//! positions in the log, in append order.

use provenance_core::{Event, EventId, Sequence, StorageError};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub(crate) struct LogState {
    events: Vec<Event>,
    by_id: HashMap<EventId, usize>,
    by_subject: HashMap<String, Vec<usize>>,
    by_correlation: HashMap<String, Vec<usize>>,
    by_actor: HashMap<String, Vec<usize>>,
    /// Distinct subjects in first-seen order
    subject_order: Vec<String>,
    next_sequence: Sequence,
}

impl LogState {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
            by_subject: HashMap::new(),
            by_correlation: HashMap::new(),
            by_actor: HashMap::new(),
            subject_order: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Assign the next sequence, push the event and update every index.
    pub(crate) fn append(&mut self, mut event: Event) -> &Event {
        event.sequence = self.next_sequence;
        self.next_sequence += 1;

        let pos = self.events.len();

        // A re-imported id keeps pointing at its first occurrence.
        self.by_id.entry(event.id).or_insert(pos);

        match self.by_subject.entry(event.subject.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(pos),
            Entry::Vacant(entry) => {
                self.subject_order.push(event.subject.clone());
                entry.insert(vec![pos]);
            }
        }
        if let Some(correlation) = &event.correlation {
            self.by_correlation
                .entry(correlation.clone())
                .or_default()
                .push(pos);
        }
        self.by_actor.entry(event.actor.clone()).or_default().push(pos);

        self.events.push(event);
        &self.events[pos]
    }

    pub(crate) fn current_sequence(&self) -> Sequence {
        self.next_sequence - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn get(&self, id: EventId) -> Option<&Event> {
        self.by_id.get(&id).map(|&pos| &self.events[pos])
    }

    pub(crate) fn for_subject(&self, subject: &str) -> impl Iterator<Item = &Event> {
        Self::positions(&self.events, self.by_subject.get(subject))
    }

    pub(crate) fn for_correlation(&self, correlation: &str) -> impl Iterator<Item = &Event> {
        Self::positions(&self.events, self.by_correlation.get(correlation))
    }

    pub(crate) fn for_actor(&self, actor: &str) -> impl Iterator<Item = &Event> {
        Self::positions(&self.events, self.by_actor.get(actor))
    }

    pub(crate) fn after(&self, sequence: Sequence) -> &[Event] {
        let start = self.events.partition_point(|e| e.sequence <= sequence);
        &self.events[start..]
    }

    pub(crate) fn subjects(&self) -> &[String] {
        &self.subject_order
    }

    fn positions<'a>(
        events: &'a [Event],
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a Event> {
        positions
            .into_iter()
            .flatten()
            .filter_map(move |&pos| events.get(pos))
    }

    /// Verify that the sequence counter and every index agree with the log.
    pub(crate) fn check_consistency(&self) -> Result<(), StorageError> {
        if self.next_sequence != self.events.len() as Sequence + 1 {
            return Err(inconsistent(
                "sequence",
                format!(
                    "next sequence {} with {} events",
                    self.next_sequence,
                    self.events.len()
                ),
            ));
        }
        for (pos, event) in self.events.iter().enumerate() {
            if event.sequence != pos as Sequence + 1 {
                return Err(inconsistent(
                    "sequence",
                    format!("event at position {} has sequence {}", pos, event.sequence),
                ));
            }
        }

        let mut first_positions: HashMap<EventId, usize> = HashMap::new();
        for (pos, event) in self.events.iter().enumerate() {
            first_positions.entry(event.id).or_insert(pos);
        }
        if first_positions != self.by_id {
            return Err(inconsistent(
                "by_id",
                "id index does not map every id to its first occurrence".to_string(),
            ));
        }

        check_index("by_subject", &self.events, &self.by_subject, |e| {
            Some(e.subject.as_str())
        })?;
        check_index("by_correlation", &self.events, &self.by_correlation, |e| {
            e.correlation.as_deref()
        })?;
        check_index("by_actor", &self.events, &self.by_actor, |e| {
            Some(e.actor.as_str())
        })?;

        let ordered: HashSet<&String> = self.subject_order.iter().collect();
        if ordered.len() != self.subject_order.len() || ordered.len() != self.by_subject.len() {
            return Err(inconsistent(
                "subject_order",
                format!(
                    "{} ordered subjects for {} indexed subjects",
                    self.subject_order.len(),
                    self.by_subject.len()
                ),
            ));
        }
        if let Some(missing) = self
            .subject_order
            .iter()
            .find(|s| !self.by_subject.contains_key(*s))
        {
            return Err(inconsistent(
                "subject_order",
                format!("subject {missing} is not indexed"),
            ));
        }

        Ok(())
    }
}

fn inconsistent(index: &str, reason: String) -> StorageError {
    StorageError::IndexInconsistent {
        index: index.to_string(),
        reason,
    }
}

/// Every position is in range, keyed correctly and strictly increasing, and
/// every event carrying a key is indexed under it.
fn check_index(
    name: &str,
    events: &[Event],
    index: &HashMap<String, Vec<usize>>,
    key_of: impl Fn(&Event) -> Option<&str>,
) -> Result<(), StorageError> {
    let mut indexed = 0usize;
    for (key, positions) in index {
        if positions.is_empty() {
            return Err(inconsistent(name, format!("key {key} has no positions")));
        }
        for (i, &pos) in positions.iter().enumerate() {
            let event = events
                .get(pos)
                .ok_or_else(|| inconsistent(name, format!("position {pos} out of range")))?;
            if key_of(event) != Some(key.as_str()) {
                return Err(inconsistent(
                    name,
                    format!("position {pos} listed under {key} belongs elsewhere"),
                ));
            }
            if i > 0 && positions[i - 1] >= pos {
                return Err(inconsistent(
                    name,
                    format!("positions under {key} are not in append order"),
                ));
            }
        }
        indexed += positions.len();
    }

    let expected = events.iter().filter(|e| key_of(e).is_some()).count();
    if indexed != expected {
        return Err(inconsistent(
            name,
            format!("{indexed} indexed positions for {expected} keyed events"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_core::Payload;

    fn paused(subject: &str, actor: &str) -> Event {
        Event::new(
            subject,
            actor,
            Payload::SystemPaused {
                reason: Some("maintenance".to_string()),
            },
        )
    }

    #[test]
    fn test_empty_state() {
        let state = LogState::with_capacity(4);
        assert_eq!(state.len(), 0);
        assert_eq!(state.current_sequence(), 0);
        assert!(state.after(0).is_empty());
        assert!(state.subjects().is_empty());
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_append_assigns_sequences_and_indexes() {
        let mut state = LogState::with_capacity(4);
        let first = state.append(paused("conv-a", "alice")).sequence;
        let second = state
            .append(paused("conv-b", "bob").with_correlation("op-1"))
            .sequence;
        let third = state.append(paused("conv-a", "bob")).sequence;

        assert_eq!((first, second, third), (1, 2, 3));
        assert_eq!(state.current_sequence(), 3);
        assert_eq!(state.for_subject("conv-a").count(), 2);
        assert_eq!(state.for_actor("bob").count(), 2);
        assert_eq!(state.for_correlation("op-1").count(), 1);
        assert_eq!(state.subjects(), ["conv-a", "conv-b"]);
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_after_is_exclusive() {
        let mut state = LogState::with_capacity(4);
        for _ in 0..5 {
            state.append(paused("conv-a", "alice"));
        }
        let tail: Vec<Sequence> = state.after(3).iter().map(|e| e.sequence).collect();
        assert_eq!(tail, vec![4, 5]);
        assert!(state.after(5).is_empty());
        assert_eq!(state.after(0).len(), 5);
    }

    #[test]
    fn test_duplicate_id_keeps_first_occurrence() {
        let mut state = LogState::with_capacity(4);
        let event = paused("conv-a", "alice");
        let id = event.id;
        state.append(event.clone());
        state.append(event.with_correlation("again"));

        assert_eq!(state.len(), 2);
        assert_eq!(state.get(id).map(|e| e.sequence), Some(1));
        assert!(state.check_consistency().is_ok());
    }

    #[test]
    fn test_corrupted_index_is_detected() {
        let mut state = LogState::with_capacity(4);
        state.append(paused("conv-a", "alice"));
        state.append(paused("conv-a", "alice"));
        state.by_actor.insert("mallory".to_string(), vec![1]);

        let err = state.check_consistency().unwrap_err();
        assert!(matches!(
            err,
            StorageError::IndexInconsistent { ref index, .. } if index == "by_actor"
        ));
    }
}
