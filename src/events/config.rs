// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Revision Events
//!
//! Facts emitted by the config revision manager. Past tense, immutable,
//! serializable; the boundary layer performs the actual dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ConfigName, ConfigState, ContentHash, ElementId, RevisionId, UserName};

/// Configuration revision events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigEvent {
    /// A revision was created or updated in place
    RevisionStored(ConfigRevisionStored),

    /// A single revision was removed
    RevisionRemoved(ConfigRevisionRemoved),

    /// All superseded revisions of a configuration were purged
    RevisionsPurged(ConfigRevisionsPurged),
}

/// A configuration revision was stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRevisionStored {
    /// Unique event identifier (UUID v7 for time ordering)
    pub event_id: Uuid,

    /// When this event occurred
    pub timestamp: DateTime<Utc>,

    /// Owning element
    pub element: ElementId,

    /// Configuration name
    pub config_name: ConfigName,

    /// The stored revision
    pub revision_id: RevisionId,

    /// Lifecycle state after the store
    pub state: ConfigState,

    /// Media type of the payload
    pub content_type: String,

    /// Content address of the payload
    pub content_hash: ContentHash,

    /// User who created the revision
    pub creator: UserName,

    /// Whether a new revision row was created (false = updated in place)
    pub created: bool,
}

/// A configuration revision was removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRevisionRemoved {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub element: ElementId,
    pub config_name: ConfigName,
    pub revision_id: RevisionId,

    /// State the revision had when removed
    pub state: ConfigState,
    pub content_type: String,
    pub creator: UserName,
}

/// All superseded revisions of a configuration were purged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRevisionsPurged {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub element: ElementId,
    pub config_name: ConfigName,

    /// Number of revisions deleted
    pub removed: usize,
}

impl ConfigEvent {
    /// Extract event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ConfigEvent::RevisionStored(e) => e.timestamp,
            ConfigEvent::RevisionRemoved(e) => e.timestamp,
            ConfigEvent::RevisionsPurged(e) => e.timestamp,
        }
    }

    /// Extract the owning element
    pub fn element(&self) -> ElementId {
        match self {
            ConfigEvent::RevisionStored(e) => e.element,
            ConfigEvent::RevisionRemoved(e) => e.element,
            ConfigEvent::RevisionsPurged(e) => e.element,
        }
    }

    /// Get human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ConfigEvent::RevisionStored(_) => "ConfigRevisionStored",
            ConfigEvent::RevisionRemoved(_) => "ConfigRevisionRemoved",
            ConfigEvent::RevisionsPurged(_) => "ConfigRevisionsPurged",
        }
    }
}

impl From<ConfigRevisionStored> for ConfigEvent {
    fn from(event: ConfigRevisionStored) -> Self {
        ConfigEvent::RevisionStored(event)
    }
}

impl From<ConfigRevisionRemoved> for ConfigEvent {
    fn from(event: ConfigRevisionRemoved) -> Self {
        ConfigEvent::RevisionRemoved(event)
    }
}

impl From<ConfigRevisionsPurged> for ConfigEvent {
    fn from(event: ConfigRevisionsPurged) -> Self {
        ConfigEvent::RevisionsPurged(event)
    }
}
