//! Identity types for provenance events

use crate::DecodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Position of an event in the append order of a single store.
///
/// Assigned by the store at append time: strictly increasing, gap-free,
/// starting at 1.
pub type Sequence = u64;

/// Placeholder sequence carried by an event that has not been recorded yet.
pub const PENDING_SEQUENCE: Sequence = 0;

/// Hex-encoded content hash carried by message payloads.
pub type ContentHash = String;

/// Unique identifier for a provenance event.
///
/// Generated as UUIDv7, so ids minted by one process also sort by creation
/// time. The canonical string form is the hyphenated lowercase UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a new event id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DecodeError::InvalidEventId {
                value: s.to_string(),
            })
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for EventId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(feature = "openapi")]
impl utoipa::ToSchema for EventId {
    fn name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("EventId")
    }
}

#[cfg(feature = "openapi")]
impl utoipa::PartialSchema for EventId {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::SchemaType::Type(
                utoipa::openapi::schema::Type::String,
            ))
            .description(Some("Provenance event id (hyphenated UUID)"))
            .into()
    }
}

/// Compute the SHA-256 hash of content as lowercase hex.
///
/// Callers are free to use any hashing scheme for `content_hash` fields; the
/// store treats them as opaque strings.
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_string_round_trip() {
        let id = EventId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<EventId>().unwrap(), id);
    }

    #[test]
    fn test_event_id_parse_rejects_garbage() {
        let err = EventId::parse("not-an-id").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidEventId {
                value: "not-an-id".to_string()
            }
        );
    }

    #[test]
    fn test_event_ids_are_unique() {
        let ids: std::collections::HashSet<EventId> = (0..1000).map(|_| EventId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_event_id_serializes_as_plain_string() {
        let id = EventId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        let hash = compute_content_hash(b"abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
