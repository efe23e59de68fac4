//! Archive export and import.
//!
//! An archive is a JSON document:
//!
//! ```text
//! {"events":[...],"format_version":1,"subject":"conv-1"}
//! ```
//!
//! Object keys are sorted at every level, so exporting the same state twice
//! yields identical bytes. Import is all-or-nothing: the whole document is
//! decoded before anything is appended.

use crate::EventStore;
use provenance_core::{DecodeError, Event, ProvenanceResult, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Current archive format version.
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// Decoded archive document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventArchive {
    /// Events in their original append order
    pub events: Vec<Event>,
    pub format_version: u32,
    /// Subject the archive was exported from (None for a whole-log export)
    pub subject: Option<String>,
}

/// Decode an archive without importing it.
///
/// # Errors
///
/// - `DecodeError::Malformed` for invalid JSON or an unknown payload variant
/// - `DecodeError::UnsupportedVersion` for any `format_version` other than
///   [`ARCHIVE_FORMAT_VERSION`]
pub fn decode_archive(bytes: &[u8]) -> ProvenanceResult<EventArchive> {
    let value: Value = serde_json::from_slice(bytes).map_err(malformed)?;

    let document = value.as_object().ok_or_else(|| DecodeError::Malformed {
        reason: "archive must be a JSON object".to_string(),
    })?;
    let found = document
        .get("format_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| DecodeError::Malformed {
            reason: "missing or non-integer format_version".to_string(),
        })?;
    if found != u64::from(ARCHIVE_FORMAT_VERSION) {
        return Err(DecodeError::UnsupportedVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            supported: ARCHIVE_FORMAT_VERSION,
        }
        .into());
    }

    let archive: EventArchive = serde_json::from_value(value).map_err(malformed)?;
    Ok(archive)
}

fn malformed(err: serde_json::Error) -> DecodeError {
    DecodeError::Malformed {
        reason: err.to_string(),
    }
}

/// Rebuild every object with its keys in ascending order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut entries: Vec<(String, Value)> = object.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

impl EventStore {
    /// Export every event of a subject as an archive.
    pub fn export_subject(&self, subject: &str) -> ProvenanceResult<Vec<u8>> {
        let events: Vec<Event> = self.read_state()?.for_subject(subject).cloned().collect();
        let count = events.len();
        let bytes = self.encode(&EventArchive {
            events,
            format_version: ARCHIVE_FORMAT_VERSION,
            subject: Some(subject.to_string()),
        })?;
        info!(subject, count, bytes = bytes.len(), "Exported subject archive");
        Ok(bytes)
    }

    /// Export the whole log as an archive.
    pub fn export_all(&self) -> ProvenanceResult<Vec<u8>> {
        let events = self.read_state()?.events().to_vec();
        let count = events.len();
        let bytes = self.encode(&EventArchive {
            events,
            format_version: ARCHIVE_FORMAT_VERSION,
            subject: None,
        })?;
        info!(count, bytes = bytes.len(), "Exported full archive");
        Ok(bytes)
    }

    /// Import an archive, returning the number of events appended.
    ///
    /// Ids, timestamps, subjects, actors, payloads and causal links are kept
    /// as archived; sequences are reassigned in archive order. On a decode
    /// error nothing is appended.
    pub fn import_events(&self, bytes: &[u8]) -> ProvenanceResult<usize> {
        let EventArchive {
            events, subject, ..
        } = decode_archive(bytes)?;
        let count = events.len();

        let first_sequence = {
            let mut state = self.write_state()?;
            let first = state.current_sequence() + 1;
            for event in events {
                state.append(event);
            }
            first
        };

        info!(
            subject = subject.as_deref().unwrap_or("<all>"),
            count,
            first_sequence,
            "Imported archive"
        );
        Ok(count)
    }

    fn encode(&self, archive: &EventArchive) -> ProvenanceResult<Vec<u8>> {
        let value = serde_json::to_value(archive).map_err(serialization_failed)?;
        let value = canonicalize(value);
        let bytes = if self.config().export_pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        }
        .map_err(serialization_failed)?;
        Ok(bytes)
    }
}

fn serialization_failed(err: serde_json::Error) -> StorageError {
    StorageError::SerializationFailed {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_core::{EventLog, EventLogExt, Payload, ProvenanceError, StoreConfig};

    fn populated() -> EventStore {
        let store = EventStore::new();
        let created = store
            .record_conversation_created("conv-1", "alice", "Decoders", vec!["alice".into()])
            .unwrap();
        store
            .record_message_sent("conv-1", "alice", "m-1", "user", None, "h1", Some(created.id))
            .unwrap();
        store
            .record(
                Event::new(
                    "conv-1",
                    "bot",
                    Payload::InsightRecorded {
                        insight_ref: "i-1".to_string(),
                        summary: "Threshold near 1%".to_string(),
                        derived_from: vec!["m-1".to_string()],
                        confidence: Some(0.83),
                    },
                )
                .with_correlation("op-1"),
            )
            .unwrap();
        store
            .record_decision("conv-2", "bob", "d-1", "Ship", "ready", vec![])
            .unwrap();
        store
    }

    fn is_malformed(result: ProvenanceResult<usize>) -> bool {
        matches!(result, Err(ProvenanceError::Decode(DecodeError::Malformed { .. })))
    }

    #[test]
    fn test_export_is_deterministic_and_sorted() {
        let store = populated();
        let first = store.export_subject("conv-1").unwrap();
        let second = store.export_subject("conv-1").unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert!(text.starts_with("{\"events\":["));
        let version = text.find("\"format_version\":1").unwrap();
        let subject = text.find("\"subject\":\"conv-1\"}").unwrap();
        assert!(version < subject);

        let actor = text.find("\"actor\"").unwrap();
        let causation = text.find("\"causation\"").unwrap();
        let id = text.find("\"id\"").unwrap();
        let timestamp = text.find("\"timestamp\"").unwrap();
        assert!(actor < causation && causation < id && id < timestamp);
    }

    #[test]
    fn test_export_import_round_trip_reassigns_sequences() {
        let source = populated();
        let bytes = source.export_subject("conv-1").unwrap();

        let target = EventStore::new();
        target
            .record(Event::new("other", "zed", Payload::SystemResumed))
            .unwrap();
        assert_eq!(target.import_events(&bytes).unwrap(), 3);

        let original = source.events_for_subject("conv-1").unwrap();
        let imported = target.events_for_subject("conv-1").unwrap();
        assert_eq!(imported.len(), original.len());
        for (before, after) in original.iter().zip(&imported) {
            assert_eq!(after.sequence, before.sequence + 1);
            assert_eq!(after.id, before.id);
            assert_eq!(after.timestamp, before.timestamp);
            assert_eq!(after.payload, before.payload);
            assert_eq!(after.actor, before.actor);
            assert_eq!(after.correlation, before.correlation);
            assert_eq!(after.causation, before.causation);
        }
        assert!(target.check_consistency().is_ok());
    }

    #[test]
    fn test_export_all_has_null_subject() {
        let store = populated();
        let archive = decode_archive(&store.export_all().unwrap()).unwrap();
        assert_eq!(archive.events.len(), 4);
        assert!(archive.subject.is_none());
    }

    #[test]
    fn test_export_pretty_decodes_to_same_archive() {
        let compact = populated();
        let pretty = EventStore::with_config(StoreConfig {
            export_pretty: true,
            ..StoreConfig::default()
        })
        .unwrap();
        pretty.import_events(&compact.export_all().unwrap()).unwrap();

        let pretty_bytes = pretty.export_subject("conv-1").unwrap();
        assert!(pretty_bytes.contains(&b'\n'));
        assert_eq!(
            decode_archive(&pretty_bytes).unwrap(),
            decode_archive(&compact.export_subject("conv-1").unwrap()).unwrap()
        );
    }

    #[test]
    fn test_empty_subject_exports_empty_archive() {
        let store = EventStore::new();
        let bytes = store.export_subject("none").unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "{\"events\":[],\"format_version\":1,\"subject\":\"none\"}"
        );
        assert_eq!(store.import_events(&bytes).unwrap(), 0);
    }

    #[test]
    fn test_malformed_json_appends_nothing() {
        let store = populated();
        let before = store.len().unwrap();
        assert!(is_malformed(store.import_events(b"{\"events\": [")));
        assert!(is_malformed(store.import_events(b"[1, 2, 3]")));
        assert_eq!(store.len().unwrap(), before);
    }

    #[test]
    fn test_unknown_payload_variant_appends_nothing() {
        let store = populated();
        let mut value: Value = serde_json::from_slice(&store.export_subject("conv-1").unwrap())
            .unwrap();
        value["events"][2]["payload"]["type"] = Value::String("telepathy".to_string());
        let bytes = serde_json::to_vec(&value).unwrap();

        let target = EventStore::new();
        assert!(is_malformed(target.import_events(&bytes)));
        assert!(target.is_empty().unwrap());
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let store = EventStore::new();
        let result = store.import_events(b"{\"events\":[],\"format_version\":2,\"subject\":null}");
        assert!(matches!(
            result,
            Err(ProvenanceError::Decode(DecodeError::UnsupportedVersion {
                found: 2,
                supported: 1
            }))
        ));
        assert!(is_malformed(store.import_events(b"{\"events\":[]}")));
    }
}
