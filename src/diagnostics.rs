// Copyright (c) 2025 - Cowboy AI, Inc.
//! Operation Outcomes and Diagnostics
//!
//! Every engine operation returns an [`OperationOutcome`]: the result
//! value, the domain events the boundary layer must publish, and a list
//! of human-readable diagnostics. Nothing is accumulated in ambient
//! state - the caller receives the complete story of each call and
//! decides what to do with it.

use serde::{Deserialize, Serialize};

use crate::events::LifecycleEvent;

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// A human-readable status entry produced alongside an operation result
///
/// Diagnostics are a side channel parallel to the return value; they are
/// never used for control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Result of one engine operation: value, events to publish, diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome<T> {
    /// The operation's return value
    pub value: T,

    /// Domain events for the boundary dispatcher; empty when the
    /// operation was a no-op
    pub events: Vec<LifecycleEvent>,

    /// Status entries for the diagnostics sink
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> OperationOutcome<T> {
    /// An outcome with no events and no diagnostics
    pub fn new(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Attach an event
    pub fn with_event(mut self, event: impl Into<LifecycleEvent>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Attach a diagnostic
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Map the value, keeping events and diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationOutcome<U> {
        OperationOutcome {
            value: f(self.value),
            events: self.events,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accumulates_events_and_diagnostics() {
        let outcome = OperationOutcome::new(7)
            .with_diagnostic(Diagnostic::info("stored"))
            .with_diagnostic(Diagnostic::warning("unknown image skipped"));

        assert_eq!(outcome.value, 7);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.diagnostics.len(), 2);
        assert_eq!(outcome.diagnostics[1].severity, Severity::Warning);
    }

    #[test]
    fn test_map_preserves_diagnostics() {
        let outcome = OperationOutcome::new(1)
            .with_diagnostic(Diagnostic::info("one"))
            .map(|n| n + 1);
        assert_eq!(outcome.value, 2);
        assert_eq!(outcome.diagnostics.len(), 1);
    }
}
