//! Display text for [`Message`].
//!
//! All operator-facing wording lives here; call sites only pick a variant
//! and supply its parameters.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONNECTION MESSAGES ===
            Message::ConnectingTo(store) => format!("Connecting to {}", store),
            Message::ConnectionCloseFailed(store, error) => format!("Failed to close the connection to {} cleanly: {}", store, error),

            // === BACKUP MESSAGES ===
            Message::BackupCreated(path) => format!("Backup written to {}", path),
            Message::BackupSkippedNetworked(store) => format!("{} is a networked store, no file backup taken", store),
            Message::BackupFailedContinuing(path, error) => {
                format!("Backup of {} failed ({}), continuing without a backup", path, error)
            }
            Message::BackupRequiredHint => "Set DBKEEP_BACKUP_POLICY=warn to run without a backup.".to_string(),

            // === CONFIRMATION MESSAGES ===
            Message::ConfirmClear(tables, store) => {
                format!("Delete ALL rows from {} in {}? This cannot be undone", tables.join(", "), store)
            }
            Message::ConfirmResetSequences(tables, store) => {
                format!("Reset id sequences of {} in {}?", tables.join(", "), store)
            }
            Message::OperationCancelled => "Operation cancelled.".to_string(),

            // === REPORT MESSAGES ===
            Message::DeletionsHeader => "Row deletion".to_string(),
            Message::SequenceResetsHeader => "Sequence reset".to_string(),
            Message::StatementsHeader(script) => format!("Statements of {}", script),
            Message::VerificationHeader => "Verification".to_string(),
            Message::AllOperationsSucceeded(total) => format!("All {} operation(s) completed.", total),
            Message::PartialSuccess {
                succeeded,
                skipped,
                failed,
            } => format!(
                "Partial success: {} succeeded, {} skipped, {} failed.",
                succeeded, skipped, failed
            ),
            Message::StrictModeFailure(failed) => format!("Strict mode: {} failed operation(s), exiting with an error.", failed),

            // === SCRIPT MESSAGES ===
            Message::ScriptLoaded(script, count) => format!("Loaded {} with {} statement(s)", script, count),
            Message::ScriptEmpty(script) => format!("{} contains no statements, nothing to do.", script),
            Message::ScriptReadFailed(path) => format!("Failed to read script {}", path),
            Message::RunRecorded(id) => format!("Run recorded in ledger as #{}", id),
            Message::RunRecordFailed(error) => format!("Failed to record the run in the ledger: {}", error),

            // === VERIFICATION MESSAGES ===
            Message::SampleHeader(table, limit) => format!("First {} row(s) of {}", limit, table),
            Message::SampleEmpty(table) => format!("{} is empty.", table),
            Message::VerificationFailed(table, error) => format!("Could not verify {}: {}", table, error),

            // === INSPECTION MESSAGES ===
            Message::TablesHeader(store) => format!("Tables in {}", store),
            Message::NoTablesFound => "No tables found.".to_string(),
            Message::HistoryHeader => "Replayed scripts".to_string(),
            Message::HistoryEmpty => "No scripts have been replayed against this store.".to_string(),

            // === ERROR MESSAGES ===
            Message::RunAborted(error) => format!("Run aborted: {}", error),
        };
        write!(f, "{}", text)
    }
}
