//! Error types for lifecycle operations

use thiserror::Error;

use crate::domain::identifiers::NameError;
use crate::domain::version::VersionParseError;
use crate::domain::{ConfigState, ElementId, ImageId, RevisionId};
use crate::state_machine::TransitionError;
use crate::store::StoreError;

/// Errors that can occur in lifecycle operations
///
/// Every variant is a local decision point; nothing is swallowed or
/// retried internally. `is_conflict()` groups the variants a caller may
/// meaningfully retry or resolve, `is_not_found()` the missing-resource
/// lookups.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Referenced entity does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// No active revision exists for the configuration
    #[error("no active revision for configuration {name} on element {element}")]
    NoActiveRevision { element: ElementId, name: String },

    /// Restore is only legal from the superseded state
    #[error("revision {revision} is not restorable from state {state}")]
    NotRestorable {
        revision: RevisionId,
        state: ConfigState,
    },

    /// Image deletion blocked by references
    #[error(
        "image {image} cannot be removed: referenced by {bindings} element binding(s) \
         and {releases} release(s)"
    )]
    ImageReferenced {
        image: ImageId,
        bindings: usize,
        releases: usize,
    },

    /// An actively running image cannot be unbound from its element
    #[error("image {image} is active on element {element} and cannot be removed")]
    BindingActive { element: ElementId, image: ImageId },

    /// Optimistic lock staleness; safe to retry at the caller's discretion
    #[error("stale aggregate version: observed {observed}, current {current}")]
    StaleVersion { observed: u64, current: u64 },

    /// Malformed input missing a required discriminator
    #[error("unprocessable request: {0}")]
    Unprocessable(String),

    /// Programmer misuse, not a recoverable condition
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Invalid state transition detected by a lifecycle state machine
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Invalid version string
    #[error(transparent)]
    InvalidVersion(#[from] VersionParseError),

    /// Invalid identifier or name
    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl LifecycleError {
    /// Shorthand for a typed not-found error
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        LifecycleError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether this error is a conflict (state logic, referential
    /// integrity or lock staleness)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotRestorable { .. }
                | LifecycleError::ImageReferenced { .. }
                | LifecycleError::BindingActive { .. }
                | LifecycleError::StaleVersion { .. }
                | LifecycleError::InvalidTransition(_)
        )
    }

    /// Whether this error is a missing-resource lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotFound { .. } | LifecycleError::NoActiveRevision { .. }
        )
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StaleVersion {
                observed, current, ..
            } => LifecycleError::StaleVersion { observed, current },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_classification() {
        let stale = LifecycleError::StaleVersion {
            observed: 1,
            current: 2,
        };
        assert!(stale.is_conflict());
        assert!(!stale.is_not_found());

        let missing = LifecycleError::not_found("image", "42");
        assert!(missing.is_not_found());
        assert!(!missing.is_conflict());
    }

    #[test]
    fn test_not_restorable_message_names_state() {
        let err = LifecycleError::NotRestorable {
            revision: RevisionId::random(),
            state: ConfigState::Active,
        };
        assert!(err.to_string().contains("not restorable from state ACTIVE"));
    }
}
