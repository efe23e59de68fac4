//! The closed payload vocabulary of provenance events.
//!
//! Every variant carries only strings, string lists and optional scalars, so
//! a log of payloads is self-contained and can be archived without the
//! domain objects that produced it.
//!
//! Payloads serialize with an internal `type` tag in snake_case:
//!
//! ```text
//! {"type": "message_sent", "message_ref": "msg-1", "role": "human", ...}
//! ```

use crate::{ArtifactKind, EntityCategory};
use serde::{Deserialize, Serialize};

/// Event payload containing the actual provenance data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    // === Conversation lifecycle ===
    /// A new research conversation was created.
    ConversationCreated {
        title: String,
        participants: Vec<String>,
    },
    /// A conversation was branched into a side conversation.
    ConversationBranched {
        /// The subject (or message within it) the branch starts from
        from_ref: String,
        reason: String,
        new_title: String,
    },
    ConversationArchived {
        reason: Option<String>,
    },
    ConversationUnarchived,
    ConversationTitleUpdated {
        old_title: String,
        new_title: String,
    },
    /// A conversation summary was generated or refreshed.
    ConversationSummarized {
        summary: String,
    },

    // === Messages ===
    /// A message was sent in a conversation.
    MessageSent {
        message_ref: String,
        /// "human", "counsel", "system", ...
        role: String,
        model_used: Option<String>,
        content_hash: String,
    },
    MessageEdited {
        message_ref: String,
        old_hash: String,
        new_hash: String,
        reason: Option<String>,
    },
    /// A side conversation was folded back into its parent as a synthesis message.
    SideConversationSynthesized {
        side_ref: String,
        synthesis_ref: String,
        summary: String,
    },

    // === Artifacts ===
    /// An artifact was first introduced to the conversation.
    ArtifactIntroduced {
        uri: String,
        /// Free-form kind; see [`crate::ArtifactKind`] for the known values
        kind: String,
        version: Option<String>,
        display_name: String,
    },
    /// An artifact was referenced by a message after its introduction.
    ArtifactReferenced {
        uri: String,
        message_ref: String,
        context_snippet: String,
    },
    ArtifactMetadataUpdated {
        uri: String,
        field: String,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    /// An artifact's content was fetched or verified.
    ArtifactResolved {
        uri: String,
        details: String,
    },
    /// Two artifacts were linked ("cites", "extends", "contradicts", ...).
    ArtifactLinked {
        source_uri: String,
        target_uri: String,
        relationship: String,
    },

    // === Insights ===
    InsightRecorded {
        insight_ref: String,
        summary: String,
        /// Message refs or artifact URIs the insight was drawn from
        derived_from: Vec<String>,
        confidence: Option<f64>,
    },

    // === Decisions ===
    DecisionMade {
        decision_ref: String,
        description: String,
        rationale: String,
        alternatives: Vec<String>,
    },
    DecisionRevised {
        decision_ref: String,
        old_description: String,
        new_description: String,
        reason: String,
    },

    // === System ===
    SystemPaused {
        reason: Option<String>,
    },
    SystemResumed,
    SnapshotCreated {
        snapshot_ref: String,
        format: String,
    },
    Exported {
        export_ref: String,
        format: String,
        destination: String,
    },
    Imported {
        import_ref: String,
        source: String,
        original_subject_ref: Option<String>,
    },
}

impl Payload {
    /// Entity category affected by this payload.
    pub fn category(&self) -> EntityCategory {
        match self {
            Payload::ConversationCreated { .. }
            | Payload::ConversationBranched { .. }
            | Payload::ConversationArchived { .. }
            | Payload::ConversationUnarchived
            | Payload::ConversationTitleUpdated { .. }
            | Payload::ConversationSummarized { .. } => EntityCategory::Conversation,

            Payload::MessageSent { .. }
            | Payload::MessageEdited { .. }
            | Payload::SideConversationSynthesized { .. } => EntityCategory::Message,

            Payload::ArtifactIntroduced { .. }
            | Payload::ArtifactReferenced { .. }
            | Payload::ArtifactMetadataUpdated { .. }
            | Payload::ArtifactResolved { .. }
            | Payload::ArtifactLinked { .. } => EntityCategory::Artifact,

            Payload::InsightRecorded { .. } => EntityCategory::Insight,

            Payload::DecisionMade { .. } | Payload::DecisionRevised { .. } => {
                EntityCategory::Decision
            }

            Payload::SystemPaused { .. }
            | Payload::SystemResumed
            | Payload::SnapshotCreated { .. }
            | Payload::Exported { .. }
            | Payload::Imported { .. } => EntityCategory::System,
        }
    }

    /// Serialized `type` tag of this payload.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::ConversationCreated { .. } => "conversation_created",
            Payload::ConversationBranched { .. } => "conversation_branched",
            Payload::ConversationArchived { .. } => "conversation_archived",
            Payload::ConversationUnarchived => "conversation_unarchived",
            Payload::ConversationTitleUpdated { .. } => "conversation_title_updated",
            Payload::ConversationSummarized { .. } => "conversation_summarized",
            Payload::MessageSent { .. } => "message_sent",
            Payload::MessageEdited { .. } => "message_edited",
            Payload::SideConversationSynthesized { .. } => "side_conversation_synthesized",
            Payload::ArtifactIntroduced { .. } => "artifact_introduced",
            Payload::ArtifactReferenced { .. } => "artifact_referenced",
            Payload::ArtifactMetadataUpdated { .. } => "artifact_metadata_updated",
            Payload::ArtifactResolved { .. } => "artifact_resolved",
            Payload::ArtifactLinked { .. } => "artifact_linked",
            Payload::InsightRecorded { .. } => "insight_recorded",
            Payload::DecisionMade { .. } => "decision_made",
            Payload::DecisionRevised { .. } => "decision_revised",
            Payload::SystemPaused { .. } => "system_paused",
            Payload::SystemResumed => "system_resumed",
            Payload::SnapshotCreated { .. } => "snapshot_created",
            Payload::Exported { .. } => "exported",
            Payload::Imported { .. } => "imported",
        }
    }

    /// Short human-readable description, for audit display and logs.
    pub fn describe(&self) -> String {
        match self {
            Payload::ConversationCreated { title, .. } => {
                format!("Conversation created: {}", title)
            }
            Payload::ConversationBranched {
                new_title, reason, ..
            } => format!("Branched: {} ({})", new_title, reason),
            Payload::ConversationArchived { reason: Some(r) } => {
                format!("Conversation archived: {}", r)
            }
            Payload::ConversationArchived { reason: None } => "Conversation archived".to_string(),
            Payload::ConversationUnarchived => "Conversation unarchived".to_string(),
            Payload::ConversationTitleUpdated { new_title, .. } => {
                format!("Title updated: {}", new_title)
            }
            Payload::ConversationSummarized { .. } => "Summary generated".to_string(),

            Payload::MessageSent {
                role,
                model_used: Some(model),
                ..
            } => format!("Message from {} ({})", role, model),
            Payload::MessageSent { role, .. } => format!("Message from {}", role),
            Payload::MessageEdited { message_ref, .. } => {
                format!("Message {} edited", message_ref)
            }
            Payload::SideConversationSynthesized { summary, .. } => {
                format!("Side conversation synthesized: {}", summary)
            }

            Payload::ArtifactIntroduced {
                kind, display_name, ..
            } => format!("{} introduced: {}", kind, display_name),
            Payload::ArtifactReferenced { uri, .. } => format!("Artifact referenced: {}", uri),
            Payload::ArtifactMetadataUpdated { uri, field, .. } => {
                format!("Artifact {} updated: {}", uri, field)
            }
            Payload::ArtifactResolved { uri, .. } => format!("Artifact resolved: {}", uri),
            Payload::ArtifactLinked {
                source_uri,
                target_uri,
                relationship,
            } => format!("{} {} {}", source_uri, relationship, target_uri),

            Payload::InsightRecorded { summary, .. } => format!("Insight: {}", summary),

            Payload::DecisionMade { description, .. } => format!("Decision: {}", description),
            Payload::DecisionRevised {
                new_description, ..
            } => format!("Decision revised: {}", new_description),

            Payload::SystemPaused { reason: Some(r) } => format!("System paused: {}", r),
            Payload::SystemPaused { reason: None } => "System paused".to_string(),
            Payload::SystemResumed => "System resumed".to_string(),
            Payload::SnapshotCreated { snapshot_ref, .. } => {
                format!("Snapshot created: {}", snapshot_ref)
            }
            Payload::Exported {
                format,
                destination,
                ..
            } => format!("Exported as {} to {}", format, destination),
            Payload::Imported { source, .. } => format!("Imported from {}", source),
        }
    }

    /// Artifact URIs this payload refers to, in field order.
    ///
    /// Links yield both endpoints. Non-artifact payloads yield nothing.
    pub fn artifact_uris(&self) -> Vec<&str> {
        match self {
            Payload::ArtifactIntroduced { uri, .. }
            | Payload::ArtifactReferenced { uri, .. }
            | Payload::ArtifactMetadataUpdated { uri, .. }
            | Payload::ArtifactResolved { uri, .. } => vec![uri.as_str()],
            Payload::ArtifactLinked {
                source_uri,
                target_uri,
                ..
            } => vec![source_uri.as_str(), target_uri.as_str()],
            _ => Vec::new(),
        }
    }

    /// Parsed kind of an introduced artifact.
    ///
    /// Unrecognized kind strings come back as [`ArtifactKind::Unknown`].
    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self {
            Payload::ArtifactIntroduced { kind, .. } => {
                Some(kind.parse().unwrap_or(ArtifactKind::Unknown))
            }
            _ => None,
        }
    }

    /// Whether this payload refers to the given artifact URI.
    pub fn references_artifact(&self, uri: &str) -> bool {
        self.artifact_uris().contains(&uri)
    }

    /// Decision reference for decision payloads.
    pub fn decision_ref(&self) -> Option<&str> {
        match self {
            Payload::DecisionMade { decision_ref, .. }
            | Payload::DecisionRevised { decision_ref, .. } => Some(decision_ref.as_str()),
            _ => None,
        }
    }
}
