//! Provenance Core - Event Vocabulary and Log Contracts
//!
//! Data types shared by every provenance crate: the closed payload
//! vocabulary, the event envelope, identifiers, errors, configuration and
//! the [`EventLog`] trait that storage backends implement.

mod config;
mod enums;
mod error;
mod event;
mod identity;
mod log;
mod payload;

pub use config::{StoreConfig, DEFAULT_INITIAL_CAPACITY};
pub use enums::{ArtifactKind, CategoryParseError, EntityCategory};
pub use error::{ConfigError, DecodeError, ProvenanceError, ProvenanceResult, StorageError};
pub use event::Event;
pub use identity::{
    compute_content_hash, ContentHash, EventId, Sequence, Timestamp, PENDING_SEQUENCE,
};
pub use log::{EventLog, EventLogExt};
pub use payload::Payload;

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Event ids survive a trip through their canonical string form.
        #[test]
        fn prop_event_id_display_parse(bytes in any::<[u8; 16]>()) {
            let id = EventId::from_uuid(uuid::Uuid::from_bytes(bytes));
            let parsed: EventId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }

        /// Anything that is not a UUID is rejected as an invalid event id.
        #[test]
        fn prop_event_id_rejects_non_uuid(s in "[g-z ]{1,40}") {
            let result = EventId::parse(&s);
            prop_assert!(
                matches!(result, Err(DecodeError::InvalidEventId { .. })),
                "expected InvalidEventId error"
            );
        }

        /// Any depth limit of at least 1 validates.
        #[test]
        fn prop_config_accepts_positive_depth_limit(limit in 1usize..10_000) {
            let config = StoreConfig {
                lineage_depth_limit: Some(limit),
                ..StoreConfig::default()
            };
            prop_assert!(config.validate().is_ok());
        }

        /// Content hashes are 64 lowercase hex characters and deterministic.
        #[test]
        fn prop_content_hash_shape(content in proptest::collection::vec(any::<u8>(), 0..256)) {
            let hash = compute_content_hash(&content);
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
            prop_assert_eq!(hash, compute_content_hash(&content));
        }
    }
}
