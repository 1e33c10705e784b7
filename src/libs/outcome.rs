//! Per-target results of a maintenance run and their aggregation.

use super::error::StoreError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    /// The target was absent (or, for scripts, already in the desired state).
    SkippedNotFound,
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeStatus::Succeeded => "succeeded",
            OutcomeStatus::SkippedNotFound => "skipped (not found)",
            OutcomeStatus::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Result of applying one operation to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub target: String,
    pub status: OutcomeStatus,
    pub affected_count: Option<u64>,
    pub error_message: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded(target: impl Into<String>, affected_count: Option<u64>) -> Self {
        Self {
            target: target.into(),
            status: OutcomeStatus::Succeeded,
            affected_count,
            error_message: None,
        }
    }

    pub fn skipped(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            status: OutcomeStatus::SkippedNotFound,
            affected_count: None,
            error_message: Some(reason.into()),
        }
    }

    pub fn failed(target: impl Into<String>, error: &StoreError) -> Self {
        Self {
            target: target.into(),
            status: OutcomeStatus::Failed,
            affected_count: None,
            error_message: Some(error.message.clone()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Status counts over one or more outcome blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl OutcomeSummary {
    pub fn of(outcomes: &[OperationOutcome]) -> Self {
        let mut summary = Self::default();
        summary.add(outcomes);
        summary
    }

    pub fn add(&mut self, outcomes: &[OperationOutcome]) {
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Succeeded => self.succeeded += 1,
                OutcomeStatus::SkippedNotFound => self.skipped += 1,
                OutcomeStatus::Failed => self.failed += 1,
            }
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    pub fn is_full_success(&self) -> bool {
        self.failed == 0
    }
}

/// How a finished run maps onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing failed.
    Clean,
    /// Some targets failed, tolerated.
    Partial,
    /// Some targets failed and strict mode is on.
    StrictFailure,
}

impl RunStatus {
    pub fn from_summary(summary: &OutcomeSummary, strict: bool) -> Self {
        match (summary.is_full_success(), strict) {
            (true, _) => RunStatus::Clean,
            (false, false) => RunStatus::Partial,
            (false, true) => RunStatus::StrictFailure,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Clean | RunStatus::Partial => 0,
            RunStatus::StrictFailure => 2,
        }
    }
}
