//! Sequential replay of maintenance scripts.
//!
//! Statements run one at a time, in script order, against a single
//! connection: later statements may depend on schema changes made by earlier
//! ones. A failing statement is recorded and the run moves on; nothing is
//! retried and nothing is wrapped in a transaction.

use super::error::Result;
use super::outcome::OperationOutcome;
use super::script::{split_statements, MaintenanceStatement};
use crate::db::connection::Connection;
use tracing::{debug, warn};

/// Longest statement excerpt used as an outcome target.
const TARGET_EXCERPT_CHARS: usize = 60;

/// Splits `script` for the connection's dialect and runs every statement.
pub fn run_script(conn: &mut Connection, script: &str) -> Result<Vec<OperationOutcome>> {
    let statements = split_statements(script, conn.kind())?;
    Ok(run_statements(conn, &statements))
}

/// Runs already split statements, producing one outcome per statement in
/// the same order.
pub fn run_statements(conn: &mut Connection, statements: &[MaintenanceStatement]) -> Vec<OperationOutcome> {
    statements.iter().map(|statement| run_statement(conn, statement)).collect()
}

fn run_statement(conn: &mut Connection, statement: &MaintenanceStatement) -> OperationOutcome {
    let target = statement_target(statement);

    match conn.execute(&statement.text) {
        Ok(affected) => {
            debug!(ordinal = statement.ordinal, ?affected, "statement succeeded");
            OperationOutcome::succeeded(target, affected)
        }
        Err(error) if error.is_absent_or_present() => {
            debug!(ordinal = statement.ordinal, %error, "statement skipped");
            OperationOutcome::skipped(target, error.message)
        }
        Err(error) => {
            warn!(ordinal = statement.ordinal, %error, "statement failed");
            OperationOutcome::failed(target, &error)
        }
    }
}

/// `#<ordinal> <first line of the statement, shortened>`.
pub fn statement_target(statement: &MaintenanceStatement) -> String {
    let first_line = statement.text.lines().next().unwrap_or_default().trim();
    let excerpt: String = first_line.chars().take(TARGET_EXCERPT_CHARS).collect();
    let shortened = excerpt.len() < first_line.len() || statement.text.lines().nth(1).is_some();

    if shortened {
        format!("#{} {}...", statement.ordinal, excerpt)
    } else {
        format!("#{} {}", statement.ordinal, excerpt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_statement_target_is_verbatim() {
        let statement = MaintenanceStatement {
            ordinal: 2,
            text: "DELETE FROM x WHERE y IS NULL".to_string(),
        };
        assert_eq!(statement_target(&statement), "#2 DELETE FROM x WHERE y IS NULL");
    }

    #[test]
    fn multiline_statement_target_is_marked_shortened() {
        let statement = MaintenanceStatement {
            ordinal: 1,
            text: "UPDATE clients\nSET city = 'Riga'".to_string(),
        };
        assert_eq!(statement_target(&statement), "#1 UPDATE clients...");
    }
}
