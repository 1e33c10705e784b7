//! Two-statement script that adds a column when it is missing and fills the
//! rows that have no value yet.
//!
//! Replaying it twice is harmless: the second `ALTER` reports the column as
//! already present and the `UPDATE` finds nothing left to fill.

use super::error::{MaintenanceError, Result};
use crate::db::connection::{quote_ident, quote_literal};

pub fn backfill_script(table: &str, column: &str, column_type: &str, value: &str) -> Result<String> {
    let column_type = column_type.trim();
    if column_type.is_empty() || column_type.contains(';') {
        return Err(MaintenanceError::Script(format!("invalid column type '{}'", column_type)));
    }

    let table = quote_ident(table);
    let column = quote_ident(column);
    Ok(format!(
        "ALTER TABLE {table} ADD COLUMN {column} {column_type};\nUPDATE {table} SET {column} = {value} WHERE {column} IS NULL;\n",
        value = quote_literal(value),
    ))
}
