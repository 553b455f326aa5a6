// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lifecycle Domain Events
//!
//! This module defines all domain events for the artifact lifecycle
//! bounded context. Events are immutable facts representing state
//! changes that have occurred.
//!
//! # Event Principles
//!
//! 1. **Events are immutable**: Once created, events never change
//! 2. **Events are past tense**: Named for what happened (Stored, not
//!    Store)
//! 3. **Events are returned, not fired**: Every operation returns the
//!    events it produced inside its [`OperationOutcome`]; the boundary
//!    layer performs the actual dispatch. The engine knows nothing about
//!    the transport.
//! 4. **Events are serializable**: For the boundary's wire format
//!
//! [`OperationOutcome`]: crate::diagnostics::OperationOutcome
//!
//! # Module Organization
//!
//! - [`config`] - Configuration revision events
//! - [`image`] - Image lifecycle and element binding events

pub mod config;
pub mod image;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use config::{
    ConfigEvent, ConfigRevisionRemoved, ConfigRevisionStored, ConfigRevisionsPurged,
};
pub use image::{
    AutoProvisionTargetChanged, ElementImageRemoved, ElementImagesRecorded, ImageEvent,
    ImageRegistered, ImageRemoved, ImageStateChanged,
};

/// Lifecycle Domain Events
///
/// Polymorphic envelope over all event families, so the boundary
/// dispatcher can handle any engine event while each variant stays
/// strongly typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregate_type", content = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Events from configuration revision histories
    Config(ConfigEvent),

    /// Events from image lifecycles and element bindings
    Image(ImageEvent),
}

impl LifecycleEvent {
    /// Extract event timestamp from any event type
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LifecycleEvent::Config(event) => event.timestamp(),
            LifecycleEvent::Image(event) => event.timestamp(),
        }
    }

    /// Get human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Config(event) => event.event_type_name(),
            LifecycleEvent::Image(event) => event.event_type_name(),
        }
    }
}

impl From<ConfigEvent> for LifecycleEvent {
    fn from(event: ConfigEvent) -> Self {
        LifecycleEvent::Config(event)
    }
}

impl From<ImageEvent> for LifecycleEvent {
    fn from(event: ImageEvent) -> Self {
        LifecycleEvent::Image(event)
    }
}

macro_rules! lifecycle_event_from {
    ($($leaf:ty => $family:ident),* $(,)?) => {
        $(impl From<$leaf> for LifecycleEvent {
            fn from(event: $leaf) -> Self {
                LifecycleEvent::$family(event.into())
            }
        })*
    };
}

lifecycle_event_from! {
    ConfigRevisionStored => Config,
    ConfigRevisionRemoved => Config,
    ConfigRevisionsPurged => Config,
    ImageRegistered => Image,
    ImageStateChanged => Image,
    ImageRemoved => Image,
    AutoProvisionTargetChanged => Image,
    ElementImageRemoved => Image,
    ElementImagesRecorded => Image,
}
