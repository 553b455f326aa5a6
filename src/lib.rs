//! Versioned-artifact lifecycle engine for network-inventory record
//! stores.
//!
//! This crate manages multiple revisions of two artifact kinds - device
//! configuration payloads and firmware/software images - under a shared
//! discipline of content-addressed deduplication, ordered version
//! comparison, and state-machine transitions (candidate →
//! active/release → superseded → revoked), including rollback and
//! restore.
//!
//! # Architecture
//!
//! ```text
//! caller ── ConfigRevisionManager ──┐
//!        ── ImageLifecycleManager ──┼── InventoryStore (gateway)
//!        ── ElementImageManager  ───┘
//!                  │
//!                  └─ OperationOutcome { value, events, diagnostics }
//! ```
//!
//! Every operation is one synchronous transaction against the store,
//! guarded by an optimistic per-aggregate version counter. Domain events
//! are returned to the caller for dispatch - the engine knows nothing
//! about transports, deployment mechanics or presentation.

pub mod aggregate;
pub mod diagnostics;
pub mod domain;
pub mod errors;
pub mod events;
pub mod state_machine;
pub mod store;

// Re-export commonly used types
pub use aggregate::{
    ConfigRevisionManager, ElementImageManager, ImageLifecycleManager, OperationContext,
};
pub use diagnostics::{Diagnostic, OperationOutcome, Severity};
pub use errors::{LifecycleError, LifecycleResult};
pub use events::LifecycleEvent;
pub use store::{AggregateKey, InventoryStore, MemoryStore, StoreError};
