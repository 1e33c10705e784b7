//! Bulk clearing of named tables.
//!
//! Tables are processed one by one in the order given. A failure on one
//! table never stops the others and nothing is rolled back: the report says
//! precisely which tables were emptied.

use super::config::StoreKind;
use super::error::{StoreError, StoreErrorKind};
use super::outcome::OperationOutcome;
use super::targets::TargetTable;
use crate::db::connection::{quote_ident, quote_literal, Connection};
use serde::Serialize;
use tracing::{debug, warn};

const NO_SEQUENCE_ROW: &str = "no sequence recorded for table";

/// Outcome blocks of a clear run. The sequence-reset block is present only
/// when the reset pass was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    pub deletions: Vec<OperationOutcome>,
    pub sequence_resets: Option<Vec<OperationOutcome>>,
}

impl ClearReport {
    pub fn blocks(&self) -> Vec<&[OperationOutcome]> {
        let mut blocks = vec![self.deletions.as_slice()];
        if let Some(resets) = &self.sequence_resets {
            blocks.push(resets.as_slice());
        }
        blocks
    }
}

/// Deletes every row of every table, then optionally resets their sequences.
pub fn clear_all(conn: &mut Connection, tables: &[TargetTable], reset_sequences: bool) -> ClearReport {
    let deletions = tables.iter().map(|table| delete_rows(conn, table)).collect();
    let sequence_resets = reset_sequences.then(|| reset_all(conn, tables));

    ClearReport {
        deletions,
        sequence_resets,
    }
}

/// Resets the id sequence of every table, one outcome per table.
pub fn reset_all(conn: &mut Connection, tables: &[TargetTable]) -> Vec<OperationOutcome> {
    tables.iter().map(|table| reset_sequence(conn, table)).collect()
}

fn delete_rows(conn: &mut Connection, table: &TargetTable) -> OperationOutcome {
    let sql = format!("DELETE FROM {}", quote_ident(&table.name));

    match conn.execute(&sql) {
        Ok(affected) => {
            debug!(table = %table.name, ?affected, "rows deleted");
            OperationOutcome::succeeded(&table.name, Some(affected.unwrap_or(0)))
        }
        Err(error) if error.is_missing() && table.may_not_exist => {
            debug!(table = %table.name, %error, "table absent, skipped");
            OperationOutcome::skipped(&table.name, error.message)
        }
        Err(error) => {
            warn!(table = %table.name, %error, "delete failed");
            OperationOutcome::failed(&table.name, &error)
        }
    }
}

/// The store may simply have no sequence for a table; that is a skip, not a
/// failure, whatever `may_not_exist` says.
fn reset_sequence(conn: &mut Connection, table: &TargetTable) -> OperationOutcome {
    let result = match conn.kind() {
        // AUTOINCREMENT counters live in sqlite_sequence, which only exists
        // once some table uses AUTOINCREMENT.
        StoreKind::Embedded => {
            let sql = format!("DELETE FROM sqlite_sequence WHERE name = {}", quote_literal(&table.name));
            conn.execute(&sql).and_then(|affected| match affected {
                Some(0) | None => Err(StoreError::new(StoreErrorKind::Missing, NO_SEQUENCE_ROW)),
                Some(count) => Ok(Some(count)),
            })
        }
        StoreKind::Networked => {
            let sequence = format!("{}_id_seq", table.name);
            conn.execute(&format!("ALTER SEQUENCE {} RESTART WITH 1", quote_ident(&sequence)))
        }
    };

    match result {
        Ok(affected) => {
            debug!(table = %table.name, "sequence reset");
            OperationOutcome::succeeded(&table.name, affected)
        }
        Err(error) if error.is_missing() => OperationOutcome::skipped(&table.name, error.message),
        Err(error) => {
            warn!(table = %table.name, %error, "sequence reset failed");
            OperationOutcome::failed(&table.name, &error)
        }
    }
}
