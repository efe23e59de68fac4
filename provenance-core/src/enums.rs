//! Enum types for provenance events

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTITY CATEGORY
// ============================================================================

/// Coarse classification of what an event affects.
///
/// Every payload variant maps to exactly one category; the mapping lives in
/// [`crate::Payload::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// Research conversation lifecycle
    Conversation,
    /// Messages inside a conversation
    Message,
    /// Papers, documents, datasets and other referenced artifacts
    Artifact,
    /// Insights or conclusions
    Insight,
    /// Decisions and their revisions
    Decision,
    /// Store-level and housekeeping events
    System,
}

impl EntityCategory {
    /// All categories, in declaration order.
    pub const ALL: [EntityCategory; 6] = [
        EntityCategory::Conversation,
        EntityCategory::Message,
        EntityCategory::Artifact,
        EntityCategory::Insight,
        EntityCategory::Decision,
        EntityCategory::System,
    ];

    /// Lowercase name used in display and serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Conversation => "conversation",
            EntityCategory::Message => "message",
            EntityCategory::Artifact => "artifact",
            EntityCategory::Insight => "insight",
            EntityCategory::Decision => "decision",
            EntityCategory::System => "system",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conversation" => Ok(EntityCategory::Conversation),
            "message" => Ok(EntityCategory::Message),
            "artifact" => Ok(EntityCategory::Artifact),
            "insight" => Ok(EntityCategory::Insight),
            "decision" => Ok(EntityCategory::Decision),
            "system" => Ok(EntityCategory::System),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid entity category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid entity category: {}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

// ============================================================================
// ARTIFACT KIND
// ============================================================================

/// Kinds of artifacts a research conversation can reference.
///
/// Payloads carry the kind as a free-form string; this enum is the lenient
/// parser callers use to interpret it. Unrecognized strings map to
/// [`ArtifactKind::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Paper,
    Document,
    Repository,
    Dataset,
    /// Robot or other hardware configuration
    Robot,
    /// Real-time data stream
    Stream,
    ExternalUrl,
    Unknown,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Paper => "paper",
            ArtifactKind::Document => "document",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Dataset => "dataset",
            ArtifactKind::Robot => "robot",
            ArtifactKind::Stream => "stream",
            ArtifactKind::ExternalUrl => "external_url",
            ArtifactKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "paper" => ArtifactKind::Paper,
            "document" => ArtifactKind::Document,
            "repository" | "repo" => ArtifactKind::Repository,
            "dataset" | "data" => ArtifactKind::Dataset,
            "robot" | "hardware" => ArtifactKind::Robot,
            "stream" => ArtifactKind::Stream,
            "external_url" | "url" | "external" => ArtifactKind::ExternalUrl,
            _ => ArtifactKind::Unknown,
        })
    }
}
