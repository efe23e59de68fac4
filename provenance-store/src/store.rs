//! In-memory event store.
//!
//! [`EventStore`] keeps the whole log in memory behind a single
//! `Arc<RwLock<..>>`. Appends take the write lock, queries take the read lock
//! once for their whole duration, so no reader ever observes a half-applied
//! append. Clones share the same underlying log.

use crate::state::LogState;
use provenance_core::{
    EntityCategory, Event, EventId, EventLog, ProvenanceError, ProvenanceResult, Sequence,
    StorageError, StoreConfig,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Append-only, in-memory provenance event store.
///
/// # Example
///
/// ```rust
/// use provenance_core::{EventLog, EventLogExt};
/// use provenance_store::EventStore;
///
/// let store = EventStore::new();
/// let created = store
///     .record_conversation_created("conv-1", "alice", "Surface codes", vec!["alice".into()])
///     .unwrap();
/// assert_eq!(created.sequence, 1);
/// assert_eq!(store.current_sequence().unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EventStore {
    state: Arc<RwLock<LogState>>,
    config: Arc<StoreConfig>,
}

impl EventStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Create an empty store with a validated configuration.
    pub fn with_config(config: StoreConfig) -> ProvenanceResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(LogState::with_capacity(
                config.initial_capacity,
            ))),
            config: Arc::new(config),
        }
    }

    /// Configuration this store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub(crate) fn read_state(&self) -> ProvenanceResult<RwLockReadGuard<'_, LogState>> {
        self.state
            .read()
            .map_err(|_| ProvenanceError::Storage(StorageError::LockPoisoned))
    }

    pub(crate) fn write_state(&self) -> ProvenanceResult<RwLockWriteGuard<'_, LogState>> {
        self.state
            .write()
            .map_err(|_| ProvenanceError::Storage(StorageError::LockPoisoned))
    }

    /// Number of recorded events.
    pub fn len(&self) -> ProvenanceResult<usize> {
        Ok(self.read_state()?.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> ProvenanceResult<bool> {
        Ok(self.read_state()?.len() == 0)
    }

    /// Distinct subjects, in the order they first appeared.
    pub fn subjects(&self) -> ProvenanceResult<Vec<String>> {
        Ok(self.read_state()?.subjects().to_vec())
    }

    /// Snapshot of the whole log in append order.
    pub fn all_events(&self) -> ProvenanceResult<Vec<Event>> {
        Ok(self.read_state()?.events().to_vec())
    }

    /// Events of one category within a subject, in append order.
    pub fn events_by_category(
        &self,
        subject: &str,
        category: EntityCategory,
    ) -> ProvenanceResult<Vec<Event>> {
        let state = self.read_state()?;
        Ok(state
            .for_subject(subject)
            .filter(|e| e.category() == category)
            .cloned()
            .collect())
    }

    /// Verify that sequences are gap-free and every index agrees with the log.
    pub fn check_consistency(&self) -> ProvenanceResult<()> {
        self.read_state()?.check_consistency()?;
        Ok(())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog for EventStore {
    fn record(&self, event: Event) -> ProvenanceResult<Event> {
        let mut state = self.write_state()?;
        let stored = state.append(event).clone();
        debug!(
            sequence = stored.sequence,
            subject = %stored.subject,
            kind = stored.payload.kind_name(),
            "Recorded provenance event"
        );
        Ok(stored)
    }

    fn current_sequence(&self) -> ProvenanceResult<Sequence> {
        Ok(self.read_state()?.current_sequence())
    }

    fn get_event(&self, id: EventId) -> ProvenanceResult<Option<Event>> {
        Ok(self.read_state()?.get(id).cloned())
    }

    fn events_for_subject(&self, subject: &str) -> ProvenanceResult<Vec<Event>> {
        Ok(self.read_state()?.for_subject(subject).cloned().collect())
    }

    fn events_after(&self, sequence: Sequence) -> ProvenanceResult<Vec<Event>> {
        Ok(self.read_state()?.after(sequence).to_vec())
    }

    fn events_by_correlation(&self, correlation: &str) -> ProvenanceResult<Vec<Event>> {
        Ok(self
            .read_state()?
            .for_correlation(correlation)
            .cloned()
            .collect())
    }

    fn events_by_actor(&self, actor: &str) -> ProvenanceResult<Vec<Event>> {
        Ok(self.read_state()?.for_actor(actor).cloned().collect())
    }
}
