//! Error types for provenance store operations

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Index {index} inconsistent with log: {reason}")]
    IndexInconsistent { index: String, reason: String },

    #[error("Failed to serialize events: {reason}")]
    SerializationFailed { reason: String },
}

/// Errors decoding serialized events or identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed archive: {reason}")]
    Malformed { reason: String },

    #[error("Unsupported archive format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Invalid event id: {value}")]
    InvalidEventId { value: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    ParseFailed { reason: String },
}

/// Master error type for all provenance store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProvenanceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for provenance operations.
pub type ProvenanceResult<T> = Result<T, ProvenanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_lock_poisoned() {
        let msg = format!("{}", StorageError::LockPoisoned);
        assert!(msg.contains("lock poisoned"));
    }

    #[test]
    fn test_storage_error_display_index_inconsistent() {
        let err = StorageError::IndexInconsistent {
            index: "by_actor".to_string(),
            reason: "position 7 out of range".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("by_actor"));
        assert!(msg.contains("position 7"));
    }

    #[test]
    fn test_decode_error_display_unsupported_version() {
        let err = DecodeError::UnsupportedVersion {
            found: 9,
            supported: 1,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("9"));
        assert!(msg.contains("supported: 1"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "lineage_depth_limit".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("lineage_depth_limit"));
        assert!(msg.contains("must be at least 1"));
    }

    #[test]
    fn test_provenance_error_from_variants() {
        let storage = ProvenanceError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, ProvenanceError::Storage(_)));

        let decode = ProvenanceError::from(DecodeError::Malformed {
            reason: "eof".to_string(),
        });
        assert!(matches!(decode, ProvenanceError::Decode(_)));

        let config = ProvenanceError::from(ConfigError::ParseFailed {
            reason: "bad toml".to_string(),
        });
        assert!(matches!(config, ProvenanceError::Config(_)));
    }
}
