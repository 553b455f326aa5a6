// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Store Implementation
//!
//! BTreeMap-backed [`InventoryStore`] with deterministic iteration
//! order. Backs the test suites and embedded use; a database-backed
//! gateway at the boundary implements the same trait.

use std::collections::BTreeMap;

use super::{AggregateKey, InventoryStore, StoreError};
use crate::domain::{
    ConfigName, ConfigRevision, ContentHash, ContentRecord, ElementId, ElementImageBinding,
    ImageId, ImageRecord, ImageScopeQuery, ReleaseId, ReleaseRecord, RevisionId,
};

/// In-memory inventory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    versions: BTreeMap<AggregateKey, u64>,
    contents: BTreeMap<ContentHash, ContentRecord>,
    revisions: BTreeMap<RevisionId, ConfigRevision>,
    images: BTreeMap<ImageId, ImageRecord>,
    bindings: BTreeMap<(ElementId, ImageId), ElementImageBinding>,
    releases: BTreeMap<ReleaseId, ReleaseRecord>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct content records (for dedup assertions)
    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    /// Number of stored revisions across all configurations
    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }
}

impl InventoryStore for MemoryStore {
    fn aggregate_version(&self, key: &AggregateKey) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    fn lock_with_increment(
        &mut self,
        key: &AggregateKey,
        observed: u64,
    ) -> Result<(), StoreError> {
        let current = self.aggregate_version(key);
        if current != observed {
            return Err(StoreError::StaleVersion {
                key: key.to_string(),
                observed,
                current,
            });
        }
        self.versions.insert(key.clone(), current + 1);
        Ok(())
    }

    fn content(&self, hash: &ContentHash) -> Option<ContentRecord> {
        self.contents.get(hash).cloned()
    }

    fn put_content(&mut self, payload: Vec<u8>, content_type: &str) -> ContentHash {
        let hash = ContentHash::of(&payload);
        self.contents
            .entry(hash.clone())
            .or_insert_with(|| ContentRecord {
                hash: hash.clone(),
                content_type: content_type.to_string(),
                payload,
            });
        hash
    }

    fn config_revision(&self, id: RevisionId) -> Option<ConfigRevision> {
        self.revisions.get(&id).cloned()
    }

    fn config_revisions(&self, element: ElementId, name: &ConfigName) -> Vec<ConfigRevision> {
        let mut revisions: Vec<ConfigRevision> = self
            .revisions
            .values()
            .filter(|r| r.element == element && r.name == *name)
            .cloned()
            .collect();
        // Newest first; revision id (time-ordered) breaks timestamp ties.
        revisions.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.revision_id.cmp(&a.revision_id))
        });
        revisions
    }

    fn upsert_config_revision(&mut self, revision: ConfigRevision) {
        self.revisions.insert(revision.revision_id, revision);
    }

    fn remove_config_revision(&mut self, id: RevisionId) -> bool {
        self.revisions.remove(&id).is_some()
    }

    fn image(&self, id: ImageId) -> Option<ImageRecord> {
        self.images.get(&id).cloned()
    }

    fn query_images(&self, query: &ImageScopeQuery) -> Vec<ImageRecord> {
        self.images
            .values()
            .filter(|image| query.matches(image))
            .cloned()
            .collect()
    }

    fn upsert_image(&mut self, image: ImageRecord) {
        self.images.insert(image.image_id, image);
    }

    fn remove_image(&mut self, id: ImageId) -> bool {
        self.images.remove(&id).is_some()
    }

    fn binding(&self, element: ElementId, image: ImageId) -> Option<ElementImageBinding> {
        self.bindings.get(&(element, image)).cloned()
    }

    fn bindings_of(&self, element: ElementId) -> Vec<ElementImageBinding> {
        self.bindings
            .range((element, ImageId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(|((e, _), _)| *e == element)
            .map(|(_, binding)| binding.clone())
            .collect()
    }

    fn image_binding_count(&self, image: ImageId) -> usize {
        self.bindings.keys().filter(|(_, i)| *i == image).count()
    }

    fn upsert_binding(&mut self, binding: ElementImageBinding) {
        self.bindings
            .insert((binding.element, binding.image), binding);
    }

    fn remove_binding(&mut self, element: ElementId, image: ImageId) -> bool {
        self.bindings.remove(&(element, image)).is_some()
    }

    fn release_reference_count(&self, image: ImageId) -> usize {
        self.releases
            .values()
            .filter(|release| release.images.contains(&image))
            .count()
    }

    fn upsert_release(&mut self, release: ReleaseRecord) {
        self.releases.insert(release.release_id, release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_with_increment_detects_staleness() {
        let mut store = MemoryStore::new();
        let key = AggregateKey::Config(ElementId::random());

        let observed = store.aggregate_version(&key);
        assert_eq!(observed, 0);

        // First writer succeeds and bumps the counter.
        store.lock_with_increment(&key, observed).unwrap();
        assert_eq!(store.aggregate_version(&key), 1);

        // A writer that read before the bump is stale.
        let err = store.lock_with_increment(&key, observed).unwrap_err();
        assert_eq!(
            err,
            StoreError::StaleVersion {
                key: key.to_string(),
                observed: 0,
                current: 1,
            }
        );
    }

    #[test]
    fn test_put_content_deduplicates() {
        let mut store = MemoryStore::new();
        let first = store.put_content(b"payload".to_vec(), "text/plain");
        let second = store.put_content(b"payload".to_vec(), "application/json");

        assert_eq!(first, second);
        assert_eq!(store.content_count(), 1);
        // The original record wins; the second put changed nothing.
        assert_eq!(store.content(&first).unwrap().content_type, "text/plain");
    }

    #[test]
    fn test_bindings_of_returns_only_that_element() {
        let mut store = MemoryStore::new();
        let a = ElementId::random();
        let b = ElementId::random();
        let image = ImageId::random();

        for element in [a, b] {
            store.upsert_binding(ElementImageBinding {
                element,
                image,
                installation_state: crate::domain::InstallationState::Cached,
                auto_provision: false,
                installed_at: None,
            });
        }

        assert_eq!(store.bindings_of(a).len(), 1);
        assert_eq!(store.image_binding_count(image), 2);
    }
}
