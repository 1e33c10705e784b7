//! Read-only checks after a mutation.
//!
//! Nothing here changes the outcome of a run. Errors are returned to the
//! caller, which logs them and carries on.

use super::error::{MaintenanceError, Result};
use crate::db::connection::{quote_ident, Connection, RowSnapshot};
use serde::Serialize;
use tracing::warn;

/// What is left in one table after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCheck {
    pub table: String,
    pub remaining: Option<u64>,
    pub sample: Vec<RowSnapshot>,
    pub error: Option<String>,
}

/// Up to `limit` rows of `table`, in the store's natural order.
pub fn sample(conn: &mut Connection, table: &str, limit: usize) -> Result<Vec<RowSnapshot>> {
    let sql = format!("SELECT * FROM {} LIMIT {}", quote_ident(table), limit);
    conn.query_rows(&sql).map_err(|source| MaintenanceError::Verification {
        table: table.to_string(),
        source,
    })
}

/// Row count plus a small sample for every table; failures are recorded
/// on the check instead of being returned.
pub fn check_tables<'a, I>(conn: &mut Connection, tables: I, limit: usize) -> Vec<TableCheck>
where
    I: IntoIterator<Item = &'a str>,
{
    tables
        .into_iter()
        .map(|table| {
            let counted = conn.count_rows(table).map_err(|source| MaintenanceError::Verification {
                table: table.to_string(),
                source,
            });
            let sampled = counted.and_then(|remaining| sample(conn, table, limit).map(|rows| (remaining, rows)));

            match sampled {
                Ok((remaining, sample)) => TableCheck {
                    table: table.to_string(),
                    remaining: Some(remaining),
                    sample,
                    error: None,
                },
                Err(error) => {
                    warn!(table, %error, "verification failed");
                    TableCheck {
                        table: table.to_string(),
                        remaining: None,
                        sample: Vec::new(),
                        error: Some(error.to_string()),
                    }
                }
            }
        })
        .collect()
}
