// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Revision Manager
//!
//! Manages the revision history of every (element, configuration name)
//! pair: content-addressed storage of payloads, the candidate/active/
//! superseded lifecycle, and restore of superseded revisions.
//!
//! # Invariants
//!
//! - At most one Active and at most one Candidate revision per history
//! - Revisions are appended, never mutated, except for `state` and
//!   `comment` (and a pending candidate's content, which is updated in
//!   place rather than duplicated)
//! - Payload bytes are stored once per distinct content hash
//!
//! # Transaction Semantics
//!
//! Each public method is one transaction: read the history, decide,
//! lock the owning element's config aggregate with a forced version
//! increment, write. A stale lock surfaces as a conflict; the manager
//! never retries.

use tracing::debug;
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, OperationOutcome};
use crate::domain::{
    ConfigName, ConfigRevision, ConfigState, ContentHash, ElementId, RevisionId,
};
use crate::errors::{LifecycleError, LifecycleResult};
use crate::events::{ConfigRevisionRemoved, ConfigRevisionStored, ConfigRevisionsPurged};
use crate::state_machine::{ConfigCommand, StateMachine};
use crate::store::{AggregateKey, InventoryStore};

use super::OperationContext;

/// Result of storing or restoring a configuration revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfigOutcome {
    /// The revision the operation resolved to
    pub revision_id: RevisionId,

    /// Whether a new revision row was created
    pub created: bool,
}

/// Manager for configuration revision histories
///
/// Borrows the store for the duration of one transaction; construct one
/// per request with the caller's [`OperationContext`].
pub struct ConfigRevisionManager<'a, S: InventoryStore> {
    store: &'a mut S,
    context: OperationContext,
}

impl<'a, S: InventoryStore> ConfigRevisionManager<'a, S> {
    /// Create a manager bound to a store and request context
    pub fn new(store: &'a mut S, context: OperationContext) -> Self {
        Self { store, context }
    }

    /// Store a configuration revision
    ///
    /// Writes the payload through the content store (deduplicated by
    /// hash) and records the revision in the state the caller reports:
    ///
    /// - A re-report of the unchanged active configuration is a no-op
    ///   and resolves to the existing active revision.
    /// - Reporting a new active configuration supersedes the previous
    ///   active revision.
    /// - A pending candidate is updated in place - there is never a
    ///   second candidate row. A comment is only overwritten when one
    ///   was supplied or the reported state is Candidate; devices
    ///   confirming activation send no comment and must not erase one.
    /// - Otherwise a new revision is appended.
    pub fn store(
        &mut self,
        element: ElementId,
        name: ConfigName,
        content_type: &str,
        state: ConfigState,
        payload: Vec<u8>,
        comment: Option<String>,
    ) -> LifecycleResult<OperationOutcome<StoreConfigOutcome>> {
        let key = AggregateKey::Config(element);
        let observed = self.store.aggregate_version(&key);
        let hash = ContentHash::of(&payload);
        let revisions = self.store.config_revisions(element, &name);
        let latest = revisions.first().cloned();

        // Re-reported unchanged active configuration: nothing to record.
        if state == ConfigState::Active {
            if let Some(latest) = &latest {
                if latest.is_active() && latest.content_hash == hash {
                    debug!(
                        element = %element,
                        config = %name,
                        "active configuration re-reported unchanged"
                    );
                    return Ok(OperationOutcome::new(StoreConfigOutcome {
                        revision_id: latest.revision_id,
                        created: false,
                    })
                    .with_diagnostic(Diagnostic::info(format!(
                        "configuration {name} on element {element} is unchanged"
                    ))));
                }
            }
        }

        self.store.lock_with_increment(&key, observed)?;

        // A new active configuration displaces the previous active one.
        if state == ConfigState::Active {
            let displaced = match &latest {
                Some(latest) if latest.is_active() => Some(latest.clone()),
                _ => revisions.iter().find(|r| r.is_active()).cloned(),
            };
            if let Some(mut active) = displaced {
                let (next, ()) = active.state.transition(&ConfigCommand::Displace)?;
                active.state = next;
                debug!(
                    element = %element,
                    config = %name,
                    revision = %active.revision_id,
                    "superseded previous active configuration"
                );
                self.store.upsert_config_revision(active);
            }
        }

        self.store.put_content(payload, content_type);

        // Update a pending candidate in place instead of duplicating it.
        if let Some(mut candidate) = latest.filter(|l| l.is_candidate()) {
            let (next, ()) = candidate
                .state
                .transition(&ConfigCommand::recording(state))?;
            candidate.state = next;
            candidate.content_hash = hash.clone();
            candidate.content_type = content_type.to_string();
            if comment.is_some() || state == ConfigState::Candidate {
                candidate.comment = comment;
            }
            candidate.modified_at = self.context.now;
            self.store.upsert_config_revision(candidate.clone());

            debug!(
                element = %element,
                config = %name,
                revision = %candidate.revision_id,
                state = %candidate.state,
                "updated configuration revision"
            );
            return Ok(self.stored_outcome(&candidate, false));
        }

        // Append a new revision.
        let revision = ConfigRevision {
            revision_id: RevisionId::random(),
            element,
            name: name.clone(),
            content_hash: hash,
            content_type: content_type.to_string(),
            state,
            creator: self.context.creator.clone(),
            comment,
            modified_at: self.context.now,
        };
        self.store.upsert_config_revision(revision.clone());

        debug!(
            element = %element,
            config = %name,
            revision = %revision.revision_id,
            state = %revision.state,
            "stored new configuration revision"
        );
        Ok(self.stored_outcome(&revision, true))
    }

    /// The active revision of a configuration
    pub fn get_active(
        &self,
        element: ElementId,
        name: &ConfigName,
    ) -> LifecycleResult<ConfigRevision> {
        self.store
            .config_revisions(element, name)
            .into_iter()
            .find(ConfigRevision::is_active)
            .ok_or_else(|| LifecycleError::NoActiveRevision {
                element,
                name: name.to_string(),
            })
    }

    /// The most recently modified revision, regardless of state
    pub fn get_latest(
        &self,
        element: ElementId,
        name: &ConfigName,
    ) -> LifecycleResult<ConfigRevision> {
        self.store
            .config_revisions(element, name)
            .into_iter()
            .next()
            .ok_or_else(|| {
                LifecycleError::not_found("configuration", format!("{name} on {element}"))
            })
    }

    /// One revision by id
    pub fn get_by_id(&self, revision_id: RevisionId) -> LifecycleResult<ConfigRevision> {
        self.store
            .config_revision(revision_id)
            .ok_or_else(|| LifecycleError::not_found("configuration revision", revision_id))
    }

    /// All revisions of a configuration, most recently modified first
    pub fn revisions(
        &self,
        element: ElementId,
        name: &ConfigName,
    ) -> LifecycleResult<Vec<ConfigRevision>> {
        let revisions = self.store.config_revisions(element, name);
        if revisions.is_empty() {
            return Err(LifecycleError::not_found(
                "configuration",
                format!("{name} on {element}"),
            ));
        }
        Ok(revisions)
    }

    /// Restore a superseded revision as the new candidate
    ///
    /// Only legal when the target revision is Superseded - restore is
    /// the undo path for a configuration displaced by something newer.
    /// When the current latest revision is already a candidate with the
    /// target's content, nothing is created and the existing candidate
    /// is returned; otherwise a pending candidate is replaced by a fresh
    /// clone of the target's content.
    pub fn restore(
        &mut self,
        revision_id: RevisionId,
        comment: Option<String>,
    ) -> LifecycleResult<OperationOutcome<StoreConfigOutcome>> {
        let target = self.get_by_id(revision_id)?;
        if target.state != ConfigState::Superseded {
            return Err(LifecycleError::NotRestorable {
                revision: revision_id,
                state: target.state,
            });
        }

        let key = AggregateKey::Config(target.element);
        let observed = self.store.aggregate_version(&key);
        let latest = self
            .store
            .config_revisions(target.element, &target.name)
            .into_iter()
            .next();

        // Idempotent restore: the pending candidate already carries the
        // target's content.
        if let Some(latest) = &latest {
            if latest.is_candidate() && latest.content_hash == target.content_hash {
                debug!(
                    element = %target.element,
                    config = %target.name,
                    revision = %latest.revision_id,
                    "restore resolved to existing candidate"
                );
                return Ok(OperationOutcome::new(StoreConfigOutcome {
                    revision_id: latest.revision_id,
                    created: false,
                })
                .with_diagnostic(Diagnostic::info(format!(
                    "configuration {} on element {} already has a candidate with the \
                     restored content",
                    target.name, target.element
                ))));
            }
        }

        self.store.lock_with_increment(&key, observed)?;

        // A pending candidate with different content is discarded.
        if let Some(latest) = latest.filter(|l| l.is_candidate()) {
            debug!(
                element = %target.element,
                config = %target.name,
                revision = %latest.revision_id,
                "discarded pending candidate in favor of restored revision"
            );
            self.store.remove_config_revision(latest.revision_id);
        }

        let revision = ConfigRevision {
            revision_id: RevisionId::random(),
            element: target.element,
            name: target.name.clone(),
            content_hash: target.content_hash.clone(),
            content_type: target.content_type.clone(),
            state: ConfigState::Candidate,
            creator: self.context.creator.clone(),
            comment,
            modified_at: self.context.now,
        };
        self.store.upsert_config_revision(revision.clone());

        debug!(
            element = %target.element,
            config = %target.name,
            source = %revision_id,
            revision = %revision.revision_id,
            "restored superseded revision as new candidate"
        );
        Ok(self.stored_outcome(&revision, true))
    }

    /// Update a revision's comment; nothing else is touched
    pub fn set_comment(
        &mut self,
        revision_id: RevisionId,
        comment: Option<String>,
    ) -> LifecycleResult<OperationOutcome<()>> {
        let mut revision = self.get_by_id(revision_id)?;
        let key = AggregateKey::Config(revision.element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;

        revision.comment = comment;
        self.store.upsert_config_revision(revision.clone());
        Ok(OperationOutcome::new(()).with_diagnostic(Diagnostic::info(format!(
            "updated comment of configuration revision {revision_id}"
        ))))
    }

    /// Remove a single revision
    ///
    /// A no-op when the revision does not exist; the removal fact is
    /// emitted only when a row was actually deleted.
    pub fn remove_revision(
        &mut self,
        revision_id: RevisionId,
    ) -> LifecycleResult<OperationOutcome<bool>> {
        let Some(revision) = self.store.config_revision(revision_id) else {
            return Ok(OperationOutcome::new(false));
        };

        let key = AggregateKey::Config(revision.element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;
        self.store.remove_config_revision(revision_id);

        debug!(
            element = %revision.element,
            config = %revision.name,
            revision = %revision_id,
            "removed configuration revision"
        );
        Ok(OperationOutcome::new(true)
            .with_event(ConfigRevisionRemoved {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                element: revision.element,
                config_name: revision.name.clone(),
                revision_id,
                state: revision.state,
                content_type: revision.content_type.clone(),
                creator: revision.creator.clone(),
            })
            .with_diagnostic(Diagnostic::info(format!(
                "removed revision {revision_id} of configuration {} on element {}",
                revision.name, revision.element
            ))))
    }

    /// Bulk-delete all superseded revisions of a configuration
    ///
    /// Returns the number of revisions deleted and emits a single
    /// bulk-removal fact when anything was deleted.
    pub fn purge_superseded(
        &mut self,
        element: ElementId,
        name: &ConfigName,
    ) -> LifecycleResult<OperationOutcome<usize>> {
        let superseded: Vec<ConfigRevision> = self
            .store
            .config_revisions(element, name)
            .into_iter()
            .filter(|r| r.state == ConfigState::Superseded)
            .collect();

        if superseded.is_empty() {
            return Ok(OperationOutcome::new(0));
        }

        let key = AggregateKey::Config(element);
        let observed = self.store.aggregate_version(&key);
        self.store.lock_with_increment(&key, observed)?;

        for revision in &superseded {
            self.store.remove_config_revision(revision.revision_id);
        }

        let removed = superseded.len();
        debug!(
            element = %element,
            config = %name,
            removed,
            "purged superseded configuration revisions"
        );
        Ok(OperationOutcome::new(removed)
            .with_event(ConfigRevisionsPurged {
                event_id: Uuid::now_v7(),
                timestamp: self.context.now,
                element,
                config_name: name.clone(),
                removed,
            })
            .with_diagnostic(Diagnostic::info(format!(
                "purged {removed} superseded revision(s) of configuration {name} on \
                 element {element}"
            ))))
    }

    fn stored_outcome(
        &self,
        revision: &ConfigRevision,
        created: bool,
    ) -> OperationOutcome<StoreConfigOutcome> {
        OperationOutcome::new(StoreConfigOutcome {
            revision_id: revision.revision_id,
            created,
        })
        .with_event(ConfigRevisionStored {
            event_id: Uuid::now_v7(),
            timestamp: self.context.now,
            element: revision.element,
            config_name: revision.name.clone(),
            revision_id: revision.revision_id,
            state: revision.state,
            content_type: revision.content_type.clone(),
            content_hash: revision.content_hash.clone(),
            creator: revision.creator.clone(),
            created,
        })
        .with_diagnostic(Diagnostic::info(format!(
            "stored revision {} of configuration {} on element {}",
            revision.revision_id, revision.name, revision.element
        )))
    }
}
