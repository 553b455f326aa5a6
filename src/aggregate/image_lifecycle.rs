// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image Lifecycle Manager
//!
//! Manages registration, promotion, rollback and removal of images.
//!
//! # Promotion Semantics
//!
//! Releasing an image acts on its whole promotion scope in one
//! transaction:
//!
//! 1. Every non-revoked image with a strictly lower version is
//!    superseded.
//! 2. Every non-revoked image with a strictly higher version becomes a
//!    candidate again - re-releasing an older version un-supersedes
//!    anything newer instead of leaving it stranded, which makes
//!    promotion invertible.
//! 3. The target image becomes the release.
//!
//! Scope side effects do not emit individual events; only the net
//! promotion request does. Superseded is never accepted as a direct
//! target - it is exclusively a side effect.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, OperationOutcome};
use crate::domain::{ImageId, ImageRecord, ImageScopeQuery, ImageState, PromotionScope};
use crate::errors::{LifecycleError, LifecycleResult};
use crate::events::{ImageRegistered, ImageRemoved, ImageStateChanged};
use crate::state_machine::{ImageCommand, StateMachine};
use crate::store::{AggregateKey, InventoryStore};

use super::OperationContext;

/// Manager for image lifecycles
pub struct ImageLifecycleManager<'a, S: InventoryStore> {
    store: &'a mut S,
    context: OperationContext,
}

impl<'a, S: InventoryStore> ImageLifecycleManager<'a, S> {
    /// Create a manager bound to a store and request context
    pub fn new(store: &'a mut S, context: OperationContext) -> Self {
        Self { store, context }
    }

    /// Register an image, upserting by id
    ///
    /// A new image always enters the Candidate state regardless of the
    /// state carried by the record; an existing image keeps its current
    /// lifecycle state and has its attributes replaced.
    ///
    /// Returns whether a new image was created.
    pub fn register(&mut self, image: ImageRecord) -> LifecycleResult<OperationOutcome<bool>> {
        if image.roles.is_empty() && image.owner.is_none() {
            return Err(LifecycleError::Unprocessable(
                "image must carry element roles or an owning element".to_string(),
            ));
        }

        let key = AggregateKey::of_image(&image);
        let observed = self.store.aggregate_version(&key);
        let existing = self.store.image(image.image_id);
        self.store.lock_with_increment(&key, observed)?;

        match existing {
            None => {
                let record = ImageRecord {
                    state: ImageState::Candidate,
                    ..image
                };
                self.store.upsert_image(record.clone());
                debug!(
                    image = %record.image_id,
                    name = %record.name,
                    version = %record.version,
                    "registered new image"
                );
                Ok(OperationOutcome::new(true)
                    .with_event(ImageRegistered {
                        event_id: Uuid::now_v7(),
                        timestamp: self.context.now,
                        image_id: record.image_id,
                        image_type: record.image_type.clone(),
                        name: record.name.clone(),
                        chipset: record.chipset.clone(),
                        version: record.version.clone(),
                        state: record.state,
                    })
                    .with_diagnostic(Diagnostic::info(format!(
                        "registered image {} ({})",
                        record.name, record.version
                    ))))
            }
            Some(current) => {
                let record = ImageRecord {
                    state: current.state,
                    ..image
                };
                self.store.upsert_image(record.clone());
                debug!(image = %record.image_id, "updated image attributes");
                Ok(OperationOutcome::new(false).with_diagnostic(Diagnostic::info(
                    format!("updated image {} ({})", record.name, record.version),
                )))
            }
        }
    }

    /// One image by id
    pub fn get(&self, image_id: ImageId) -> LifecycleResult<ImageRecord> {
        self.store
            .image(image_id)
            .ok_or_else(|| LifecycleError::not_found("image", image_id))
    }

    /// Request a lifecycle state for an image
    ///
    /// - A request for the current state is a no-op and emits nothing.
    /// - Superseded is rejected: it is only ever reached as a side
    ///   effect of promoting a different image.
    /// - Release triggers the scope-wide supersede/restore side effects
    ///   described in the module docs, inside the same transaction.
    /// - Revoked and Candidate are set directly with no side effects.
    pub fn promote(
        &mut self,
        image_id: ImageId,
        target: ImageState,
    ) -> LifecycleResult<OperationOutcome<ImageRecord>> {
        let image = self.get(image_id)?;

        if image.state == target {
            debug!(image = %image_id, state = %target, "image already in requested state");
            return Ok(
                OperationOutcome::new(image).with_diagnostic(Diagnostic::info(format!(
                    "image {image_id} is already in state {target}"
                ))),
            );
        }

        let command = match target {
            ImageState::Superseded => {
                return Err(LifecycleError::IllegalArgument(
                    "images must not be set to superseded directly".to_string(),
                ));
            }
            ImageState::Release => ImageCommand::Release,
            ImageState::Candidate => ImageCommand::Recandidate,
            ImageState::Revoked => ImageCommand::Revoke,
        };
        let (next_state, output) = image.state.transition(&command)?;

        let key = AggregateKey::of_image(&image);
        let observed = self.store.aggregate_version(&key);

        // Compute scope side effects against the same snapshot.
        let mut side_effects: Vec<ImageRecord> = Vec::new();
        if target == ImageState::Release {
            let scope = PromotionScope::of(&image);

            let older = ImageScopeQuery::in_scope(scope.clone())
                .strictly_older(image.version.clone());
            for mut other in self.store.query_images(&older) {
                if other.state == ImageState::Superseded {
                    continue;
                }
                let (state, _) = other.state.transition(&ImageCommand::Displace)?;
                other.state = state;
                side_effects.push(other);
            }

            let newer =
                ImageScopeQuery::in_scope(scope).strictly_newer(image.version.clone());
            for mut other in self.store.query_images(&newer) {
                if other.state == ImageState::Candidate {
                    continue;
                }
                let (state, _) = other.state.transition(&ImageCommand::Restore)?;
                other.state = state;
                side_effects.push(other);
            }
        }

        self.store.lock_with_increment(&key, observed)?;

        for other in side_effects {
            debug!(
                image = %other.image_id,
                version = %other.version,
                state = %other.state,
                trigger = %image_id,
                "promotion scope side effect"
            );
            self.store.upsert_image(other);
        }

        let previous_state = image.state;
        let mut image = image;
        image.state = next_state;
        self.store.upsert_image(image.clone());

        debug!(
            image = %image_id,
            from = %previous_state,
            to = %next_state,
            "image state changed"
        );
        let mut outcome = OperationOutcome::new(image.clone())
            .with_event(ImageStateChanged {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                image_id,
                image_type: image.image_type.clone(),
                name: image.name.clone(),
                version: image.version.clone(),
                previous_state,
                new_state: next_state,
                checksums: image.checksums.clone(),
            })
            .with_diagnostic(Diagnostic::info(format!(
                "image {} ({}) moved from {previous_state} to {next_state}",
                image.name, image.version
            )));
        for warning in output.warnings {
            warn!(image = %image_id, "{warning}");
            outcome = outcome.with_diagnostic(Diagnostic::warning(warning));
        }
        Ok(outcome)
    }

    /// Remove an image
    ///
    /// Fails with a conflict - and deletes nothing - while any element
    /// binding or release record still references the image.
    pub fn remove(&mut self, image_id: ImageId) -> LifecycleResult<OperationOutcome<ImageRecord>> {
        let image = self.get(image_id)?;

        let bindings = self.store.image_binding_count(image_id);
        let releases = self.store.release_reference_count(image_id);
        if bindings > 0 || releases > 0 {
            warn!(
                image = %image_id,
                bindings,
                releases,
                "image removal blocked by references"
            );
            return Err(LifecycleError::ImageReferenced {
                image: image_id,
                bindings,
                releases,
            });
        }

        let key = AggregateKey::of_image(&image);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;
        self.store.remove_image(image_id);

        debug!(image = %image_id, name = %image.name, "removed image");
        Ok(OperationOutcome::new(image.clone())
            .with_event(ImageRemoved {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                image_id,
                image_type: image.image_type.clone(),
                name: image.name.clone(),
                version: image.version.clone(),
            })
            .with_diagnostic(Diagnostic::info(format!(
                "removed image {} ({})",
                image.name, image.version
            ))))
    }
}
