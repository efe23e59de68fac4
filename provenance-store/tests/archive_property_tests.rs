//! Property tests for archive export and import.

use proptest::prelude::*;
use provenance_store::{decode_archive, EventLog, EventStore, StoreConfig};
use provenance_test_utils::{assertions, fixtures, generators};

fn recorded(batch: &[provenance_store::Event]) -> EventStore {
    let store = EventStore::new();
    for event in batch.iter().cloned() {
        store.record(event).unwrap();
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Exporting the same state twice produces identical bytes.
    #[test]
    fn prop_export_is_deterministic(batch in generators::arb_event_batch(30)) {
        let store = recorded(&batch);
        prop_assert_eq!(store.export_all().unwrap(), store.export_all().unwrap());
        for subject in store.subjects().unwrap() {
            prop_assert_eq!(
                store.export_subject(&subject).unwrap(),
                store.export_subject(&subject).unwrap()
            );
        }
    }

    /// Import into an empty store reproduces the log exactly.
    #[test]
    fn prop_round_trip_into_empty_store(batch in generators::arb_event_batch(30)) {
        let source = recorded(&batch);
        let bytes = source.export_all().unwrap();

        let target = EventStore::new();
        prop_assert_eq!(target.import_events(&bytes).unwrap(), batch.len());
        prop_assert_eq!(target.all_events().unwrap(), source.all_events().unwrap());
        prop_assert_eq!(target.export_all().unwrap(), bytes);
        assertions::assert_index_consistent(&target);
    }

    /// Import into a non-empty store keeps everything but the sequence.
    #[test]
    fn prop_round_trip_reassigns_sequences(
        existing in generators::arb_event_batch(10),
        batch in generators::arb_event_batch(20)
    ) {
        let source = recorded(&batch);
        let target = recorded(&existing);
        let offset = existing.len() as u64;

        let mut originals = Vec::with_capacity(batch.len());
        for subject in source.subjects().unwrap() {
            originals.extend(source.events_for_subject(&subject).unwrap());
            let before = target.current_sequence().unwrap();
            let count = target
                .import_events(&source.export_subject(&subject).unwrap())
                .unwrap();
            prop_assert_eq!(target.current_sequence().unwrap(), before + count as u64);
        }

        let imported = target.events_after(offset).unwrap();
        prop_assert_eq!(imported.len(), batch.len());
        assertions::assert_gap_free(&imported);
        for (original, copy) in originals.iter().zip(&imported) {
            assertions::assert_same_provenance(original, copy);
        }
        assertions::assert_index_consistent(&target);
    }

    /// Any strict prefix of an archive is rejected and appends nothing.
    #[test]
    fn prop_truncated_archive_is_atomic(
        batch in generators::arb_event_batch(20),
        fraction in 0.0f64..1.0
    ) {
        let bytes = recorded(&batch).export_all().unwrap();
        let cut = (((bytes.len() as f64) * fraction) as usize).min(bytes.len() - 1);
        let target = recorded(&batch);
        let before = target.len().unwrap();

        assertions::assert_decode_error(&target.import_events(&bytes[..cut]));
        prop_assert_eq!(target.len().unwrap(), before);
    }
}

#[test]
fn test_pretty_and_compact_archives_decode_equally() {
    let compact = EventStore::new();
    fixtures::research_thread(&compact).unwrap();
    let pretty = EventStore::with_config(StoreConfig {
        export_pretty: true,
        ..fixtures::minimal_config()
    })
    .unwrap();
    pretty.import_events(&compact.export_all().unwrap()).unwrap();

    let pretty_bytes = pretty.export_subject(fixtures::RESEARCH_SUBJECT).unwrap();
    let compact_bytes = compact.export_subject(fixtures::RESEARCH_SUBJECT).unwrap();
    assert_ne!(pretty_bytes, compact_bytes);
    assert_eq!(
        decode_archive(&pretty_bytes).unwrap(),
        decode_archive(&compact_bytes).unwrap()
    );
}

#[test]
fn test_unknown_version_and_garbage_are_rejected() {
    let store = EventStore::new();
    assertions::assert_decode_error(
        &store.import_events(b"{\"events\":[],\"format_version\":7,\"subject\":\"x\"}"),
    );
    assertions::assert_decode_error(&store.import_events(b"not json at all"));
    assertions::assert_decode_error(&store.import_events(b""));
    assert!(store.is_empty().unwrap());
}
