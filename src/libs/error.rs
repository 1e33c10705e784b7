//! Error taxonomy for maintenance runs.
//!
//! Two layers are kept apart:
//!
//! - [`StoreError`] is what a single statement against the store produced. It is
//!   classified once, at the point where the driver error is converted, so the
//!   runner and the bulk mutator only ever look at [`StoreErrorKind`].
//! - [`MaintenanceError`] is the run-level taxonomy. Only `Config`, `Connection`,
//!   a required `Backup` and `Script` abort a run; the rest end up as report lines.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Message fragments SQLite (and the PostgreSQL text fallback) use when the
/// statement targets an object that is not there.
const MISSING_SIGNATURES: &[&str] = &[
    "no such table",
    "no such column",
    "no such index",
    "no such view",
    "no such trigger",
    "does not exist",
];

/// Message fragments for an object that a statement tries to create but which
/// is already in place, e.g. re-running `ALTER TABLE .. ADD COLUMN`.
const PRESENT_SIGNATURES: &[&str] = &["already exists", "duplicate column name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    /// The table, column, sequence or other object is absent.
    Missing,
    /// The object a statement creates exists already.
    AlreadyPresent,
    Other,
}

/// A failed statement, classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    /// Builds an error whose kind is derived from the message text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify_message(&message),
            message,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.kind == StoreErrorKind::Missing
    }

    /// Missing or already present: the state a re-run of an idempotent
    /// maintenance script is expected to run into.
    pub fn is_absent_or_present(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Missing | StoreErrorKind::AlreadyPresent)
    }
}

/// Classifies a driver error message by its "object does not exist" or
/// "object already exists" signature.
pub fn classify_message(message: &str) -> StoreErrorKind {
    let lower = message.to_lowercase();
    if MISSING_SIGNATURES.iter().any(|signature| lower.contains(signature)) {
        StoreErrorKind::Missing
    } else if PRESENT_SIGNATURES.iter().any(|signature| lower.contains(signature)) {
        StoreErrorKind::AlreadyPresent
    } else {
        StoreErrorKind::Other
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::from_message(error.to_string())
    }
}

impl From<postgres::Error> for StoreError {
    fn from(error: postgres::Error) -> Self {
        use postgres::error::SqlState;

        let message = error
            .as_db_error()
            .map(|db_error| db_error.message().to_string())
            .unwrap_or_else(|| error.to_string());

        let kind = match error.code() {
            Some(code)
                if *code == SqlState::UNDEFINED_TABLE
                    || *code == SqlState::UNDEFINED_COLUMN
                    || *code == SqlState::UNDEFINED_OBJECT
                    || *code == SqlState::UNDEFINED_FUNCTION =>
            {
                StoreErrorKind::Missing
            }
            Some(code)
                if *code == SqlState::DUPLICATE_TABLE
                    || *code == SqlState::DUPLICATE_COLUMN
                    || *code == SqlState::DUPLICATE_OBJECT =>
            {
                StoreErrorKind::AlreadyPresent
            }
            _ => classify_message(&message),
        };

        Self { kind, message }
    }
}

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: StoreError,
    },

    #[error("connection is already closed")]
    AlreadyClosed,

    #[error("backup of {path} failed: {message}")]
    Backup { path: PathBuf, message: String },

    #[error("statement failed: {0}")]
    Statement(#[from] StoreError),

    #[error("verification of {table} failed: {source}")]
    Verification {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("script could not be split into statements: {0}")]
    Script(String),
}

pub type Result<T, E = MaintenanceError> = std::result::Result<T, E>;
