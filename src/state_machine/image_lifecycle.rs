// Copyright (c) 2025 - Cowboy AI, Inc.
//! Image Lifecycle State Machine
//!
//! # States
//!
//! - Candidate: registered, eligible for release
//! - Release: authoritative for its scope
//! - Superseded: displaced by a newer release
//! - Revoked: withdrawn; ignored by all scope matching
//!
//! # Inputs
//!
//! - Release / Recandidate / Revoke: explicit promotion requests
//! - Displace: scope side effect of releasing a newer version
//! - Restore: scope side effect of re-releasing an older version
//!
//! Superseded is never a valid *request* - it is only ever reached
//! through Displace. The manager rejects direct requests before
//! consulting this machine; Displace and Restore reject revoked images
//! because scope matching already excludes them.
//!
//! # Outputs
//!
//! Warnings for transitions that are legal but noteworthy (reviving a
//! revoked image, demoting the current release).

use super::{StateMachine, TransitionError, TransitionResult};
use crate::domain::ImageState;

/// Lifecycle command for an image (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCommand {
    /// Promote to the authoritative release
    Release,

    /// Move back to candidate on explicit request
    Recandidate,

    /// Withdraw the image
    Revoke,

    /// Displaced by the release of a newer version (scope side effect)
    Displace,

    /// Returned to candidate by the release of an older version (scope
    /// side effect)
    Restore,
}

impl std::fmt::Display for ImageCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageCommand::Release => "Release",
            ImageCommand::Recandidate => "Recandidate",
            ImageCommand::Revoke => "Revoke",
            ImageCommand::Displace => "Displace",
            ImageCommand::Restore => "Restore",
        };
        f.write_str(name)
    }
}

/// Transition output carrying warnings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionOutput {
    /// Warnings generated during transition
    pub warnings: Vec<String>,
}

impl TransitionOutput {
    /// Output with no warnings
    pub fn ok() -> Self {
        Self::default()
    }

    /// Output with one warning
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            warnings: vec![message.into()],
        }
    }
}

impl StateMachine for ImageState {
    type Input = ImageCommand;
    type Output = TransitionOutput;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ImageState::*;

        match (self, input) {
            // Explicit promotion requests
            (Revoked, ImageCommand::Release) => Ok((
                Release,
                TransitionOutput::warning("releasing a revoked image"),
            )),
            (_, ImageCommand::Release) => Ok((Release, TransitionOutput::ok())),

            (Release, ImageCommand::Recandidate) => Ok((
                Candidate,
                TransitionOutput::warning("demoting the current release to candidate"),
            )),
            (Revoked, ImageCommand::Recandidate) => Ok((
                Candidate,
                TransitionOutput::warning("reinstating a revoked image as candidate"),
            )),
            (_, ImageCommand::Recandidate) => Ok((Candidate, TransitionOutput::ok())),

            (Release, ImageCommand::Revoke) => Ok((
                Revoked,
                TransitionOutput::warning("revoking the current release"),
            )),
            (_, ImageCommand::Revoke) => Ok((Revoked, TransitionOutput::ok())),

            // Scope side effects; idempotent on their own target state
            (Candidate | Release | Superseded, ImageCommand::Displace) => {
                Ok((Superseded, TransitionOutput::ok()))
            }
            (Candidate | Release | Superseded, ImageCommand::Restore) => {
                Ok((Candidate, TransitionOutput::ok()))
            }

            (Revoked, ImageCommand::Displace | ImageCommand::Restore) => {
                Err(TransitionError::InvalidTransition {
                    from: self.to_string(),
                    input: input.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_release() {
        let (next, output) = ImageState::Candidate
            .transition(&ImageCommand::Release)
            .unwrap();
        assert_eq!(next, ImageState::Release);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_release_displacement() {
        let (next, _) = ImageState::Release
            .transition(&ImageCommand::Displace)
            .unwrap();
        assert_eq!(next, ImageState::Superseded);
    }

    #[test]
    fn test_superseded_restore() {
        let (next, _) = ImageState::Superseded
            .transition(&ImageCommand::Restore)
            .unwrap();
        assert_eq!(next, ImageState::Candidate);
    }

    #[test]
    fn test_reviving_revoked_image_warns() {
        let (next, output) = ImageState::Revoked
            .transition(&ImageCommand::Release)
            .unwrap();
        assert_eq!(next, ImageState::Release);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_revoked_excluded_from_scope_side_effects() {
        assert!(!ImageState::Revoked.can_transition(&ImageCommand::Displace));
        assert!(!ImageState::Revoked.can_transition(&ImageCommand::Restore));
    }

    #[test]
    fn test_demoting_release_warns() {
        let (next, output) = ImageState::Release
            .transition(&ImageCommand::Recandidate)
            .unwrap();
        assert_eq!(next, ImageState::Candidate);
        assert!(!output.warnings.is_empty());
    }
}
