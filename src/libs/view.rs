use super::outcome::OperationOutcome;
use super::verifier::TableCheck;
use crate::db::connection::RowSnapshot;
use crate::db::inspect::TableInfo;
use crate::db::ledger::LedgerEntry;
use anyhow::Result;
use prettytable::{row, Table};
use serde::Serialize;

pub struct View {}

impl View {
    pub fn outcomes(outcomes: &[OperationOutcome]) {
        let mut table = Table::new();

        table.add_row(row!["TARGET", "STATUS", "AFFECTED", "DETAIL"]);
        for outcome in outcomes {
            table.add_row(row![
                outcome.target,
                outcome.status,
                outcome.affected_count.map(|count| count.to_string()).unwrap_or_else(|| "-".to_string()),
                outcome.error_message.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();
    }

    pub fn checks(checks: &[TableCheck]) {
        let mut table = Table::new();

        table.add_row(row!["TABLE", "REMAINING", "SAMPLE"]);
        for check in checks {
            let sample = match &check.error {
                Some(error) => error.clone(),
                None => check.sample.iter().map(|row| row.to_string()).collect::<Vec<_>>().join("\n"),
            };
            table.add_row(row![
                check.table,
                check.remaining.map(|count| count.to_string()).unwrap_or_else(|| "?".to_string()),
                sample
            ]);
        }
        table.printstd();
    }

    pub fn rows(rows: &[RowSnapshot]) {
        let Some(first) = rows.first() else {
            return;
        };
        let mut table = Table::new();

        table.set_titles(first.columns.iter().map(|(name, _)| name.as_str()).collect());
        for row in rows {
            table.add_row(row.columns.iter().map(|(_, value)| value.as_str()).collect());
        }
        table.printstd();
    }

    pub fn tables(tables: &[TableInfo]) {
        let mut table = Table::new();

        table.add_row(row!["TABLE", "ROWS"]);
        for info in tables {
            table.add_row(row![
                info.name,
                info.rows.map(|count| count.to_string()).unwrap_or_else(|| "?".to_string())
            ]);
        }
        table.printstd();
    }

    pub fn history(entries: &[LedgerEntry]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "SCRIPT", "STATEMENTS", "SUCCEEDED", "SKIPPED", "FAILED", "APPLIED AT"]);
        for entry in entries {
            table.add_row(row![
                entry.id,
                entry.script,
                entry.statements,
                entry.succeeded,
                entry.skipped,
                entry.failed,
                entry.applied_at
            ]);
        }
        table.printstd();
    }

    /// Pretty-printed JSON on stdout, for `--json`.
    pub fn json<T: Serialize>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
