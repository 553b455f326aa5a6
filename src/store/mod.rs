// Copyright (c) 2025 - Cowboy AI, Inc.
//! Persistence Gateway
//!
//! The engine talks to its backing store through the [`InventoryStore`]
//! trait: fetch-by-key reads, typed scope queries, add/remove writes and
//! an optimistic lock-with-forced-increment per owning aggregate.
//!
//! # Transaction Semantics
//!
//! Each manager operation is one transaction:
//! 1. Read the owning aggregate's version counter
//! 2. Read whatever the decision needs (consistent snapshot - the store
//!    is borrowed for the whole call)
//! 3. `lock_with_increment` before the first write; a counter that moved
//!    past the observed value fails with a stale-version error
//! 4. Apply all writes
//!
//! The engine never retries; staleness is surfaced to the caller as a
//! conflict and retrying is the caller's decision.

pub mod memory;

use std::fmt;
use thiserror::Error;

use crate::domain::{
    ChipsetName, ConfigName, ConfigRevision, ContentHash, ContentRecord, ElementId,
    ElementImageBinding, ImageId, ImageRecord, ImageScopeQuery, ImageType, ReleaseRecord,
    RevisionId,
};

pub use memory::MemoryStore;

/// Store-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The aggregate's version counter moved past the observed value
    #[error("stale version for aggregate {key}: observed {observed}, current {current}")]
    StaleVersion {
        key: String,
        observed: u64,
        current: u64,
    },
}

/// Key of the aggregate that owns a mutation, for optimistic locking
///
/// Config histories are locked per owning element; role-wide image
/// scopes per (chipset, artifact type); bindings and element-private
/// images per element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AggregateKey {
    /// Configuration histories of one element
    Config(ElementId),

    /// Binding set and element-private images of one element
    Element(ElementId),

    /// Role-wide image scope
    ImageScope(ChipsetName, ImageType),
}

impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateKey::Config(element) => write!(f, "config/{element}"),
            AggregateKey::Element(element) => write!(f, "element/{element}"),
            AggregateKey::ImageScope(chipset, image_type) => {
                write!(f, "images/{chipset}/{image_type}")
            }
        }
    }
}

impl AggregateKey {
    /// The aggregate an image belongs to
    pub fn of_image(image: &ImageRecord) -> Self {
        match image.owner {
            Some(element) => AggregateKey::Element(element),
            None => AggregateKey::ImageScope(image.chipset.clone(), image.image_type.clone()),
        }
    }
}

/// Generic persistence gateway consumed by the lifecycle managers
///
/// Read methods return owned records (the backing row is copied out of
/// the snapshot); write methods replace whole records by key. The
/// `MemoryStore` implementation backs the test suites and any embedded
/// use; database-backed implementations live at the boundary.
pub trait InventoryStore {
    // ---- optimistic concurrency ------------------------------------

    /// Current version counter of an aggregate (0 if never written)
    fn aggregate_version(&self, key: &AggregateKey) -> u64;

    /// Compare-and-increment the aggregate's version counter
    ///
    /// Fails with [`StoreError::StaleVersion`] when the counter no
    /// longer equals `observed`. Must be called before the first write
    /// of every mutating operation.
    fn lock_with_increment(
        &mut self,
        key: &AggregateKey,
        observed: u64,
    ) -> Result<(), StoreError>;

    // ---- content store ---------------------------------------------

    /// Fetch a content record by hash
    fn content(&self, hash: &ContentHash) -> Option<ContentRecord>;

    /// Store a payload content-addressed
    ///
    /// Computes the payload hash; when a record with that hash already
    /// exists it is returned unchanged (idempotent, no new storage).
    /// There is no delete - garbage collection of unreferenced content
    /// is an external concern.
    fn put_content(&mut self, payload: Vec<u8>, content_type: &str) -> ContentHash;

    // ---- configuration revisions -----------------------------------

    /// Fetch one revision by id
    fn config_revision(&self, id: RevisionId) -> Option<ConfigRevision>;

    /// All revisions of a configuration, most recently modified first
    fn config_revisions(&self, element: ElementId, name: &ConfigName) -> Vec<ConfigRevision>;

    /// Insert or replace a revision by id
    fn upsert_config_revision(&mut self, revision: ConfigRevision);

    /// Delete one revision; returns whether a row was deleted
    fn remove_config_revision(&mut self, id: RevisionId) -> bool;

    // ---- images ----------------------------------------------------

    /// Fetch one image by id
    fn image(&self, id: ImageId) -> Option<ImageRecord>;

    /// All images matching a typed scope query
    fn query_images(&self, query: &ImageScopeQuery) -> Vec<ImageRecord>;

    /// Insert or replace an image by id
    fn upsert_image(&mut self, image: ImageRecord);

    /// Delete one image; returns whether a row was deleted
    fn remove_image(&mut self, id: ImageId) -> bool;

    // ---- element image bindings ------------------------------------

    /// Fetch one binding by (element, image)
    fn binding(&self, element: ElementId, image: ImageId) -> Option<ElementImageBinding>;

    /// All bindings of an element
    fn bindings_of(&self, element: ElementId) -> Vec<ElementImageBinding>;

    /// Number of bindings referencing an image, across all elements
    fn image_binding_count(&self, image: ImageId) -> usize;

    /// Insert or replace a binding by (element, image)
    fn upsert_binding(&mut self, binding: ElementImageBinding);

    /// Delete one binding; returns whether a row was deleted
    fn remove_binding(&mut self, element: ElementId, image: ImageId) -> bool;

    // ---- release records (deletion guard only) ---------------------

    /// Number of release records referencing an image
    fn release_reference_count(&self, image: ImageId) -> usize;

    /// Insert or replace a release record by id
    fn upsert_release(&mut self, release: ReleaseRecord);
}
