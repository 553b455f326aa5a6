// Copyright (c) 2025 - Cowboy AI, Inc.
//! Element Image Manager
//!
//! Maintains the per-element installation records (pull / cached /
//! active), the single auto-provision designation per element, and the
//! available-upgrade read path.
//!
//! # Auto-Provision Designation
//!
//! At most one binding per element carries the auto-provision flag: the
//! image the element installs when it next provisions itself. A Pull
//! binding exists only to carry that designation - once the flag moves
//! away, a Pull stub is deleted rather than kept around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, OperationOutcome};
use crate::domain::{
    ElementId, ElementImageBinding, ImageId, ImageName, ImageRecord, ImageScopeQuery,
    ImageState, ImageVersion, InstallationState, PromotionScope, UpgradeType,
};
use crate::errors::{LifecycleError, LifecycleResult};
use crate::events::{
    AutoProvisionTargetChanged, ElementImageRemoved, ElementImagesRecorded,
};
use crate::store::{AggregateKey, InventoryStore};

use super::OperationContext;

/// One entry of a device's installed-image report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledImageReport {
    /// The reported image
    pub image_id: ImageId,

    /// Whether the element currently runs this image
    pub active: bool,

    /// Installation timestamp reported by the device
    pub installed_at: Option<DateTime<Utc>>,
}

/// Counts of a binding reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconciliationSummary {
    /// Bindings created or updated from the report
    pub recorded: usize,

    /// Stale bindings removed
    pub removed: usize,
}

/// An available newer image for an installed one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableUpgrade {
    pub image_id: ImageId,
    pub name: ImageName,
    pub state: ImageState,
    pub version: ImageVersion,
    pub upgrade_type: UpgradeType,
    pub build_date: Option<DateTime<Utc>>,
}

/// Manager for element image bindings
pub struct ElementImageManager<'a, S: InventoryStore> {
    store: &'a mut S,
    context: OperationContext,
}

impl<'a, S: InventoryStore> ElementImageManager<'a, S> {
    /// Create a manager bound to a store and request context
    pub fn new(store: &'a mut S, context: OperationContext) -> Self {
        Self { store, context }
    }

    /// Designate an image as the element's auto-provision target
    ///
    /// The previous designation, if any, is released: a displaced Pull
    /// stub is deleted, any other binding merely loses the flag. When no
    /// binding exists yet for the designated image, a Pull stub carrying
    /// the flag is created.
    pub fn set_auto_provision_target(
        &mut self,
        element: ElementId,
        image_id: ImageId,
    ) -> LifecycleResult<OperationOutcome<()>> {
        // The image must be known to the inventory.
        if self.store.image(image_id).is_none() {
            return Err(LifecycleError::not_found("image", image_id));
        }

        let bindings = self.store.bindings_of(element);
        if bindings
            .iter()
            .any(|b| b.auto_provision && b.image == image_id)
        {
            debug!(element = %element, image = %image_id, "auto-provision target unchanged");
            return Ok(
                OperationOutcome::new(()).with_diagnostic(Diagnostic::info(format!(
                    "image {image_id} already is the auto-provision target of element {element}"
                ))),
            );
        }

        let key = AggregateKey::Element(element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;

        let mut designated = false;
        for mut binding in bindings {
            if binding.auto_provision {
                if binding.installation_state == InstallationState::Pull {
                    // A pull stub without the designation is meaningless.
                    debug!(
                        element = %element,
                        image = %binding.image,
                        "removed displaced auto-provision pull stub"
                    );
                    self.store.remove_binding(element, binding.image);
                } else {
                    binding.auto_provision = false;
                    self.store.upsert_binding(binding);
                }
                continue;
            }
            if binding.image == image_id {
                binding.auto_provision = true;
                self.store.upsert_binding(binding);
                designated = true;
            }
        }

        if !designated {
            self.store.upsert_binding(ElementImageBinding {
                element,
                image: image_id,
                installation_state: InstallationState::Pull,
                auto_provision: true,
                installed_at: None,
            });
        }

        debug!(element = %element, image = %image_id, "set auto-provision target");
        Ok(OperationOutcome::new(())
            .with_event(AutoProvisionTargetChanged {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                element,
                image_id: Some(image_id),
            })
            .with_diagnostic(Diagnostic::info(format!(
                "image {image_id} is now the auto-provision target of element {element}"
            ))))
    }

    /// Clear the element's auto-provision designation
    ///
    /// Symmetric cleanup: a designated Pull stub is deleted, any other
    /// designated binding keeps its row and loses the flag. A no-op when
    /// nothing is designated.
    pub fn clear_auto_provision_target(
        &mut self,
        element: ElementId,
    ) -> LifecycleResult<OperationOutcome<()>> {
        let designated: Vec<ElementImageBinding> = self
            .store
            .bindings_of(element)
            .into_iter()
            .filter(|b| b.auto_provision)
            .collect();

        if designated.is_empty() {
            return Ok(OperationOutcome::new(()));
        }

        let key = AggregateKey::Element(element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;

        for mut binding in designated {
            if binding.installation_state == InstallationState::Pull {
                self.store.remove_binding(element, binding.image);
            } else {
                binding.auto_provision = false;
                self.store.upsert_binding(binding);
            }
        }

        debug!(element = %element, "cleared auto-provision target");
        Ok(OperationOutcome::new(())
            .with_event(AutoProvisionTargetChanged {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                element,
                image_id: None,
            })
            .with_diagnostic(Diagnostic::info(format!(
                "cleared the auto-provision target of element {element}"
            ))))
    }

    /// The element's designated auto-provision image, if any
    pub fn auto_provision_target(
        &self,
        element: ElementId,
    ) -> LifecycleResult<Option<ImageRecord>> {
        Ok(self
            .store
            .bindings_of(element)
            .into_iter()
            .find(|b| b.auto_provision)
            .and_then(|b| self.store.image(b.image)))
    }

    /// Reconcile the element's bindings against a device report
    ///
    /// Reported known images are updated (active/cached), reported
    /// unknown bindings are created, and bindings absent from the report
    /// are removed - except a Pull stub carrying the auto-provision
    /// designation, which is not an installation record. A report naming
    /// an image the inventory does not know is skipped with a warning;
    /// the rest of the report is still applied.
    pub fn record_installed_images(
        &mut self,
        element: ElementId,
        reports: Vec<InstalledImageReport>,
    ) -> LifecycleResult<OperationOutcome<ReconciliationSummary>> {
        let key = AggregateKey::Element(element);
        let observed = self.store.aggregate_version(&key);

        let mut existing: BTreeMap<ImageId, ElementImageBinding> = self
            .store
            .bindings_of(element)
            .into_iter()
            .map(|b| (b.image, b))
            .collect();

        let mut upserts: Vec<ElementImageBinding> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        for report in &reports {
            let installation_state = if report.active {
                InstallationState::Active
            } else {
                InstallationState::Cached
            };

            if let Some(mut binding) = existing.remove(&report.image_id) {
                binding.installation_state = installation_state;
                if report.installed_at.is_some() {
                    binding.installed_at = report.installed_at;
                }
                upserts.push(binding);
            } else if self.store.image(report.image_id).is_some() {
                upserts.push(ElementImageBinding {
                    element,
                    image: report.image_id,
                    installation_state,
                    auto_provision: false,
                    installed_at: report.installed_at,
                });
            } else {
                warn!(
                    element = %element,
                    image = %report.image_id,
                    "element reported an image unknown to the inventory"
                );
                diagnostics.push(Diagnostic::warning(format!(
                    "element {element} reported unknown image {}; entry skipped",
                    report.image_id
                )));
            }
        }

        // Whatever was not reported is gone from the element, except a
        // designation stub.
        let stale: Vec<ElementImageBinding> = existing
            .into_values()
            .filter(|b| !b.is_designation_stub())
            .collect();

        let summary = ReconciliationSummary {
            recorded: upserts.len(),
            removed: stale.len(),
        };

        if upserts.is_empty() && stale.is_empty() {
            let mut outcome = OperationOutcome::new(summary);
            outcome.diagnostics = diagnostics;
            return Ok(outcome);
        }

        self.store.lock_with_increment(&key, observed)?;
        for binding in upserts {
            self.store.upsert_binding(binding);
        }
        for binding in &stale {
            self.store.remove_binding(element, binding.image);
        }

        debug!(
            element = %element,
            recorded = summary.recorded,
            removed = summary.removed,
            "reconciled element images"
        );
        let mut outcome = OperationOutcome::new(summary).with_event(ElementImagesRecorded {
            event_id: Uuid::now_v7(),
            timestamp: self.context.now,
            element,
            recorded: summary.recorded,
            removed: summary.removed,
        });
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Remove one binding from an element
    ///
    /// A no-op when the binding does not exist. Fails with a conflict
    /// when the element currently runs the image.
    pub fn remove_binding(
        &mut self,
        element: ElementId,
        image_id: ImageId,
    ) -> LifecycleResult<OperationOutcome<bool>> {
        let Some(binding) = self.store.binding(element, image_id) else {
            return Ok(OperationOutcome::new(false));
        };

        if binding.is_active() {
            warn!(
                element = %element,
                image = %image_id,
                "active image cannot be removed from element"
            );
            return Err(LifecycleError::BindingActive {
                element,
                image: image_id,
            });
        }

        let image = self
            .store
            .image(image_id)
            .ok_or_else(|| LifecycleError::not_found("image", image_id))?;

        let key = AggregateKey::Element(element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;
        self.store.remove_binding(element, image_id);

        debug!(element = %element, image = %image_id, "removed element image binding");
        Ok(OperationOutcome::new(true)
            .with_event(ElementImageRemoved {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                element,
                image_id,
                name: image.name.clone(),
            })
            .with_diagnostic(Diagnostic::info(format!(
                "removed image {} from element {element}",
                image.name
            ))))
    }

    /// Newer images available for an installed image
    ///
    /// Matches the installed image's promotion scope - role-wide images
    /// sharing a role, plus images privately owned by this element -
    /// and returns everything non-revoked with a strictly greater
    /// version, newest first.
    pub fn available_upgrades(
        &self,
        element: ElementId,
        image_id: ImageId,
    ) -> LifecycleResult<Vec<AvailableUpgrade>> {
        let image = self
            .store
            .image(image_id)
            .ok_or_else(|| LifecycleError::not_found("image", image_id))?;

        let role_wide = ImageScopeQuery::in_scope(PromotionScope {
            chipset: image.chipset.clone(),
            image_type: image.image_type.clone(),
            owner: None,
            roles: image.roles.clone(),
        })
        .strictly_newer(image.version.clone());

        let element_private = ImageScopeQuery::in_scope(PromotionScope {
            chipset: image.chipset.clone(),
            image_type: image.image_type.clone(),
            owner: Some(element),
            roles: image.roles.clone(),
        })
        .strictly_newer(image.version.clone());

        let mut candidates = self.store.query_images(&role_wide);
        candidates.extend(self.store.query_images(&element_private));
        candidates.sort_by(|a, b| b.version.cmp(&a.version));

        Ok(candidates
            .into_iter()
            .map(|upgrade| AvailableUpgrade {
                image_id: upgrade.image_id,
                name: upgrade.name,
                state: upgrade.state,
                upgrade_type: UpgradeType::classify(&image.version, &upgrade.version),
                version: upgrade.version,
                build_date: upgrade.build_date,
            })
            .collect())
    }
}
