use super::connection::{Backend, Connection};
use crate::libs::error::{Result, StoreError};
use serde::Serialize;

const SQLITE_TABLES: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";
const POSTGRES_TABLES: &str = "SELECT table_name::text FROM information_schema.tables
    WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
    ORDER BY table_name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    /// `None` when counting failed.
    pub rows: Option<u64>,
}

/// User tables of the store, alphabetically, with row counts.
pub fn list_tables(conn: &mut Connection) -> Result<Vec<TableInfo>> {
    let names: Vec<String> = match conn.backend_mut()? {
        Backend::Sqlite(db) => {
            let mut stmt = db.prepare(SQLITE_TABLES).map_err(StoreError::from)?;
            let names = stmt
                .query_map([], |row| row.get(0))
                .map_err(StoreError::from)?
                .collect::<rusqlite::Result<Vec<String>>>()
                .map_err(StoreError::from)?;
            names
        }
        Backend::Postgres(client) => client
            .query(POSTGRES_TABLES, &[])
            .map_err(StoreError::from)?
            .iter()
            .map(|row| row.get(0))
            .collect(),
    };

    let tables = names
        .into_iter()
        .map(|name| {
            let rows = conn.count_rows(&name).ok();
            TableInfo { name, rows }
        })
        .collect();

    Ok(tables)
}
