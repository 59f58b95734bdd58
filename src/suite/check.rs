//! The check abstraction: metadata, outcomes and the trait every check implements.

use std::fmt;

use async_trait::async_trait;

use crate::client::SutClient;

/// Where a check sits in the conformance hierarchy.
///
/// Only [`Category::Mandatory`] failures make a SUT non-compliant. The other
/// categories describe optional behaviour whose absence is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Category {
    /// Required by the protocol.
    Mandatory,
    /// Optional capability a SUT advertises (streaming, push notifications).
    Capability,
    /// Robustness and quality of implementation.
    Quality,
    /// Optional protocol feature (e.g. `referenceTaskIds`).
    Feature,
}

impl Category {
    pub fn is_optional(self) -> bool {
        self != Category::Mandatory
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Mandatory => write!(f, "mandatory"),
            Category::Capability => write!(f, "capability"),
            Category::Quality => write!(f, "quality"),
            Category::Feature => write!(f, "feature"),
        }
    }
}

/// Static description of a check, shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    /// Unique, filterable name.
    pub name: &'static str,
    pub category: Category,
    /// What the check validates.
    pub description: &'static str,
    /// What a failure means for the SUT.
    pub failure_impact: &'static str,
    /// How a SUT author would fix a failure.
    pub fix_suggestion: &'static str,
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The SUT behaved conformantly. `detail` records which of several
    /// acceptable behaviours was observed.
    Passed { detail: Option<String> },
    /// A prerequisite could not be established, so the behaviour under
    /// test was never exercised.
    Skipped { reason: String },
    /// The SUT answered in a non-conformant way, or could not be reached
    /// for the step under test.
    Failed { reason: String },
}

impl Outcome {
    pub fn pass() -> Self {
        Outcome::Passed { detail: None }
    }

    pub fn pass_with(detail: impl Into<String>) -> Self {
        Outcome::Passed {
            detail: Some(detail.into()),
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed { detail: None } => write!(f, "PASSED"),
            Outcome::Passed {
                detail: Some(detail),
            } => write!(f, "PASSED ({detail})"),
            Outcome::Skipped { reason } => write!(f, "SKIPPED ({reason})"),
            Outcome::Failed { reason } => write!(f, "FAILED ({reason})"),
        }
    }
}

/// A single conformance check against a SUT.
#[async_trait]
pub trait ConformanceCheck: Send + Sync {
    fn info(&self) -> &CheckInfo;

    /// Runs the check. Never panics on SUT misbehaviour; every problem is
    /// reported through the returned [`Outcome`].
    async fn run(&self, client: &SutClient) -> Outcome;
}
