//! History of replayed maintenance scripts.
//!
//! Every script replay appends one row to the `dbkeep_runs` tracking table,
//! which is created on first use. Unlike schema migrations, entries do not
//! gate anything: scripts are written to be idempotent and may be replayed
//! any number of times. The ledger only answers "what ran here, and how did
//! it go".
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbkeep::db::connection::Connection;
//! use dbkeep::db::ledger::{history, record_run};
//! use dbkeep::libs::config::Config;
//! use dbkeep::libs::outcome::OutcomeSummary;
//!
//! let config = Config::from_env()?;
//! let mut conn = Connection::open(&config.store)?;
//! record_run(&mut conn, "2024-05-add-tracking-code.sql", 2, &OutcomeSummary::default())?;
//! for entry in history(&mut conn)? {
//!     println!("#{} {} ({})", entry.id, entry.script, entry.applied_at);
//! }
//! # Ok::<(), dbkeep::libs::error::MaintenanceError>(())
//! ```

use super::connection::{Backend, Connection};
use crate::libs::error::{Result, StoreError};
use crate::libs::outcome::OutcomeSummary;
use chrono::Local;
use serde::Serialize;

/// Tracking table of the embedded store.
const RUNS_TABLE_SQLITE: &str = "
CREATE TABLE IF NOT EXISTS dbkeep_runs (
    id INTEGER PRIMARY KEY,
    script TEXT NOT NULL,
    statements INTEGER NOT NULL,
    succeeded INTEGER NOT NULL,
    skipped INTEGER NOT NULL,
    failed INTEGER NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Tracking table of the networked store.
const RUNS_TABLE_POSTGRES: &str = "
CREATE TABLE IF NOT EXISTS dbkeep_runs (
    id BIGSERIAL PRIMARY KEY,
    script TEXT NOT NULL,
    statements BIGINT NOT NULL,
    succeeded BIGINT NOT NULL,
    skipped BIGINT NOT NULL,
    failed BIGINT NOT NULL,
    applied_at TEXT NOT NULL
)";

const INSERT_RUN_SQLITE: &str =
    "INSERT INTO dbkeep_runs (script, statements, succeeded, skipped, failed, applied_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_RUN_POSTGRES: &str =
    "INSERT INTO dbkeep_runs (script, statements, succeeded, skipped, failed, applied_at) VALUES ($1, $2, $3, $4, $5, $6)";
const SELECT_RUNS: &str = "SELECT id, script, statements, succeeded, skipped, failed, applied_at FROM dbkeep_runs ORDER BY id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub script: String,
    pub statements: i64,
    pub succeeded: i64,
    pub skipped: i64,
    pub failed: i64,
    /// RFC 3339 local time of the replay.
    pub applied_at: String,
}

/// Appends one replay of `script` and returns the id of the new entry.
pub fn record_run(conn: &mut Connection, script: &str, statements: usize, summary: &OutcomeSummary) -> Result<i64> {
    let applied_at = Local::now().to_rfc3339();
    let statements = statements as i64;
    let (succeeded, skipped, failed) = (summary.succeeded as i64, summary.skipped as i64, summary.failed as i64);

    let id = match conn.backend_mut()? {
        Backend::Sqlite(db) => {
            db.execute(RUNS_TABLE_SQLITE, []).map_err(StoreError::from)?;
            db.execute(
                INSERT_RUN_SQLITE,
                rusqlite::params![script, statements, succeeded, skipped, failed, applied_at],
            )
            .map_err(StoreError::from)?;
            db.last_insert_rowid()
        }
        Backend::Postgres(client) => {
            client.batch_execute(RUNS_TABLE_POSTGRES).map_err(StoreError::from)?;
            let insert = format!("{} RETURNING id", INSERT_RUN_POSTGRES);
            let row = client
                .query_one(
                    insert.as_str(),
                    &[&script, &statements, &succeeded, &skipped, &failed, &applied_at],
                )
                .map_err(StoreError::from)?;
            row.get(0)
        }
    };

    Ok(id)
}

/// All recorded replays, oldest first. A store without a tracking table has
/// an empty history.
pub fn history(conn: &mut Connection) -> Result<Vec<LedgerEntry>> {
    let entries = match conn.backend_mut()? {
        Backend::Sqlite(db) => {
            let query = || -> rusqlite::Result<Vec<LedgerEntry>> {
                let mut stmt = db.prepare(SELECT_RUNS)?;
                let rows = stmt.query_map([], |row| {
                    Ok(LedgerEntry {
                        id: row.get(0)?,
                        script: row.get(1)?,
                        statements: row.get(2)?,
                        succeeded: row.get(3)?,
                        skipped: row.get(4)?,
                        failed: row.get(5)?,
                        applied_at: row.get(6)?,
                    })
                })?;
                let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(entries)
            };
            query().map_err(StoreError::from)
        }
        Backend::Postgres(client) => client
            .query(SELECT_RUNS, &[])
            .map(|rows| {
                rows.iter()
                    .map(|row| LedgerEntry {
                        id: row.get(0),
                        script: row.get(1),
                        statements: row.get(2),
                        succeeded: row.get(3),
                        skipped: row.get(4),
                        failed: row.get(5),
                        applied_at: row.get(6),
                    })
                    .collect()
            })
            .map_err(StoreError::from),
    };

    match entries {
        Ok(entries) => Ok(entries),
        Err(error) if error.is_missing() => Ok(Vec::new()),
        Err(error) => Err(error.into()),
    }
}
