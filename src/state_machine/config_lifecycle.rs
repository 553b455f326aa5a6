// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Revision State Machine
//!
//! # States
//!
//! - Candidate: uploaded, not yet authoritative
//! - Active: applied on the element
//! - Superseded: displaced by a newer active configuration
//!
//! # Inputs
//!
//! - Resubmit: Candidate → Candidate (content updated in place)
//! - Activate: Candidate → Active (activation confirmed)
//! - Displace: Active → Superseded (a newer configuration took over);
//!   also accepted on a Candidate that an element reports as displaced
//!
//! Restoring a superseded revision is not a transition of that revision:
//! it clones the content into a fresh Candidate and leaves the source
//! revision untouched.

use super::{StateMachine, TransitionError, TransitionResult};
use crate::domain::ConfigState;

/// Lifecycle command for a configuration revision (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Content re-uploaded for a pending candidate
    Resubmit,

    /// Activation confirmed by the element
    Activate,

    /// Displaced by a newer authoritative configuration
    Displace,
}

impl ConfigCommand {
    /// The command that records a reported target state on an existing
    /// candidate revision
    pub fn recording(reported: ConfigState) -> Self {
        match reported {
            ConfigState::Candidate => ConfigCommand::Resubmit,
            ConfigState::Active => ConfigCommand::Activate,
            ConfigState::Superseded => ConfigCommand::Displace,
        }
    }
}

impl std::fmt::Display for ConfigCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigCommand::Resubmit => "Resubmit",
            ConfigCommand::Activate => "Activate",
            ConfigCommand::Displace => "Displace",
        };
        f.write_str(name)
    }
}

impl StateMachine for ConfigState {
    type Input = ConfigCommand;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ConfigCommand::*;
        use ConfigState::*;

        match (self, input) {
            (Candidate, Resubmit) => Ok((Candidate, ())),
            (Candidate, Activate) => Ok((Active, ())),
            (Candidate, Displace) => Ok((Superseded, ())),
            (Active, Displace) => Ok((Superseded, ())),
            // Idempotent: displacing an already superseded revision
            (Superseded, Displace) => Ok((Superseded, ())),
            (state, input) => Err(TransitionError::InvalidTransition {
                from: state.to_string(),
                input: input.to_string(),
            }),
        }
    }
}
