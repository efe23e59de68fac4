//! Provenance Store - In-Memory Event Store
//!
//! Append-only storage for provenance events with secondary indices, causal
//! lineage walks, domain projections, statistics and JSON archives.
//!
//! The log contract lives in `provenance-core` ([`EventLog`] and
//! [`EventLogExt`]); this crate provides the in-memory implementation.

mod archive;
mod lineage;
mod projection;
mod state;
mod stats;
mod store;

pub use archive::{decode_archive, EventArchive, ARCHIVE_FORMAT_VERSION};
pub use stats::SubjectStats;
pub use store::EventStore;

// Re-export the log contract so callers can depend on this crate alone.
pub use provenance_core::{
    ArtifactKind, EntityCategory, Event, EventId, EventLog, EventLogExt, Payload, ProvenanceError,
    ProvenanceResult, Sequence, StoreConfig,
};
