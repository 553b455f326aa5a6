// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lifecycle Managers
//!
//! This module provides the engine's three managers, one per artifact
//! aggregate:
//!
//! - [`ConfigRevisionManager`] - configuration revision histories
//! - [`ImageLifecycleManager`] - image registration, promotion, removal
//! - [`ElementImageManager`] - per-element installation records and the
//!   auto-provision designation
//!
//! # Transaction Pattern
//!
//! Every public method is one synchronous transaction:
//!
//! ```text
//! read aggregate version → read snapshot → decide
//!        → lock_with_increment → write → OperationOutcome
//! ```
//!
//! A manager borrows its store mutably for one request and carries an
//! [`OperationContext`]: the authenticated creator and the transaction
//! timestamp. Domain logic never reads the clock or ambient user state -
//! both arrive from the boundary, which keeps every operation
//! deterministic and testable.
//!
//! # Results
//!
//! Methods return `OperationOutcome<T>`: the value, the domain events to
//! publish, and human-readable diagnostics. Events are returned, never
//! fired; diagnostics are a side channel, never control flow.

pub mod config_revisions;
pub mod element_images;
pub mod image_lifecycle;

use chrono::{DateTime, Utc};

use crate::domain::UserName;

pub use config_revisions::{ConfigRevisionManager, StoreConfigOutcome};
pub use element_images::{
    AvailableUpgrade, ElementImageManager, InstalledImageReport, ReconciliationSummary,
};
pub use image_lifecycle::ImageLifecycleManager;

/// Per-request context every manager operates under
///
/// Time is a parameter, never an ambient read; the same request context
/// stamps every record and event the transaction produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// Authenticated user driving the request
    pub creator: UserName,

    /// Transaction timestamp
    pub now: DateTime<Utc>,
}

impl OperationContext {
    /// Create a request context
    pub fn new(creator: UserName, now: DateTime<Utc>) -> Self {
        Self { creator, now }
    }
}
