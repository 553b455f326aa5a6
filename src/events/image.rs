// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image Lifecycle and Binding Events
//!
//! Facts emitted by the image lifecycle manager and the element image
//! manager. Scope side effects of a promotion (superseding older images,
//! restoring newer candidates) do not emit individual events - only the
//! net promotion request does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{
    ChecksumAlgorithm, ChipsetName, ElementId, ImageId, ImageName, ImageState, ImageType,
    ImageVersion,
};

/// Image lifecycle and element binding events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageEvent {
    /// A new image was registered
    Registered(ImageRegistered),

    /// An image's lifecycle state changed on explicit request
    StateChanged(ImageStateChanged),

    /// An image was removed from the inventory
    Removed(ImageRemoved),

    /// An element's auto-provision designation changed
    AutoProvisionTargetChanged(AutoProvisionTargetChanged),

    /// An image binding was removed from an element
    ElementImageRemoved(ElementImageRemoved),

    /// An element's installed images were reconciled from a device report
    ElementImagesRecorded(ElementImagesRecorded),
}

/// A new image was registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRegistered {
    /// Unique event identifier (UUID v7 for time ordering)
    pub event_id: Uuid,

    /// When this event occurred
    pub timestamp: DateTime<Utc>,

    pub image_id: ImageId,
    pub image_type: ImageType,
    pub name: ImageName,
    pub chipset: ChipsetName,
    pub version: ImageVersion,

    /// Initial lifecycle state (always candidate on registration)
    pub state: ImageState,
}

/// An image's lifecycle state changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStateChanged {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub image_id: ImageId,
    pub image_type: ImageType,
    pub name: ImageName,
    pub version: ImageVersion,

    /// State before the request
    pub previous_state: ImageState,

    /// State after the request
    pub new_state: ImageState,

    /// Checksums of the image binary, for subscribers that verify
    /// downloads
    pub checksums: BTreeMap<ChecksumAlgorithm, String>,
}

/// An image was removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRemoved {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub image_id: ImageId,
    pub image_type: ImageType,
    pub name: ImageName,
    pub version: ImageVersion,
}

/// An element's auto-provision designation changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoProvisionTargetChanged {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub element: ElementId,

    /// The newly designated image, or `None` when the designation was
    /// cleared
    pub image_id: Option<ImageId>,
}

/// An image binding was removed from an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementImageRemoved {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub element: ElementId,
    pub image_id: ImageId,
    pub name: ImageName,
}

/// An element's installed images were reconciled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementImagesRecorded {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub element: ElementId,

    /// Bindings created or updated from the report
    pub recorded: usize,

    /// Stale bindings removed
    pub removed: usize,
}

impl ImageEvent {
    /// Extract event timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ImageEvent::Registered(e) => e.timestamp,
            ImageEvent::StateChanged(e) => e.timestamp,
            ImageEvent::Removed(e) => e.timestamp,
            ImageEvent::AutoProvisionTargetChanged(e) => e.timestamp,
            ImageEvent::ElementImageRemoved(e) => e.timestamp,
            ImageEvent::ElementImagesRecorded(e) => e.timestamp,
        }
    }

    /// Get human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ImageEvent::Registered(_) => "ImageRegistered",
            ImageEvent::StateChanged(_) => "ImageStateChanged",
            ImageEvent::Removed(_) => "ImageRemoved",
            ImageEvent::AutoProvisionTargetChanged(_) => "AutoProvisionTargetChanged",
            ImageEvent::ElementImageRemoved(_) => "ElementImageRemoved",
            ImageEvent::ElementImagesRecorded(_) => "ElementImagesRecorded",
        }
    }
}

impl From<ImageRegistered> for ImageEvent {
    fn from(event: ImageRegistered) -> Self {
        ImageEvent::Registered(event)
    }
}

impl From<ImageStateChanged> for ImageEvent {
    fn from(event: ImageStateChanged) -> Self {
        ImageEvent::StateChanged(event)
    }
}

impl From<ImageRemoved> for ImageEvent {
    fn from(event: ImageRemoved) -> Self {
        ImageEvent::Removed(event)
    }
}

impl From<AutoProvisionTargetChanged> for ImageEvent {
    fn from(event: AutoProvisionTargetChanged) -> Self {
        ImageEvent::AutoProvisionTargetChanged(event)
    }
}

impl From<ElementImageRemoved> for ImageEvent {
    fn from(event: ElementImageRemoved) -> Self {
        ImageEvent::ElementImageRemoved(event)
    }
}

impl From<ElementImagesRecorded> for ImageEvent {
    fn from(event: ElementImagesRecorded) -> Self {
        ImageEvent::ElementImagesRecorded(event)
    }
}
