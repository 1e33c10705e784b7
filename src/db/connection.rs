use crate::libs::config::{StoreConfig, StoreKind};
use crate::libs::error::{MaintenanceError, Result, StoreError};
use postgres::{Client, NoTls, SimpleQueryMessage};
use rusqlite::{types::ValueRef, OpenFlags};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Query run right after opening an embedded store, so a file that is not a
/// database is reported as a connection failure rather than per statement.
const SQLITE_OPEN_CHECK: &str = "SELECT count(*) FROM sqlite_master";

/// Returns `busy, log frames, checkpointed frames`; `busy` is 1 when the
/// checkpoint could not complete.
const SQLITE_CHECKPOINT: &str = "PRAGMA wal_checkpoint(TRUNCATE)";

/// Leading keywords of statements whose affected-row count is meaningful.
const ROW_COUNTING_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "REPLACE"];

/// One row of a read query, with every value rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    pub columns: Vec<(String, String)>,
}

impl RowSnapshot {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for RowSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.columns.iter().map(|(name, value)| format!("{}={}", name, value)).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

pub(crate) enum Backend {
    Sqlite(rusqlite::Connection),
    Postgres(Client),
}

/// An open connection to the configured store.
///
/// The connection is closed explicitly with [`Connection::close`]; closing
/// twice fails with [`MaintenanceError::AlreadyClosed`]. Dropping an open
/// connection releases it as well.
pub struct Connection {
    backend: Option<Backend>,
    kind: StoreKind,
    target: String,
}

impl Connection {
    pub fn open(store: &StoreConfig) -> Result<Self> {
        let target = store.describe();
        debug!(store = %target, "opening connection");

        let backend = match store {
            StoreConfig::Embedded { path } => {
                // No SQLITE_OPEN_CREATE: a missing file must not turn into a fresh empty store.
                let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                let conn = rusqlite::Connection::open_with_flags(path, flags).map_err(|source| MaintenanceError::Connection {
                    target: target.clone(),
                    source: StoreError::other(source.to_string()),
                })?;
                conn.query_row(SQLITE_OPEN_CHECK, [], |row| row.get::<_, i64>(0))
                    .map_err(|source| MaintenanceError::Connection {
                        target: target.clone(),
                        source: StoreError::other(source.to_string()),
                    })?;
                Backend::Sqlite(conn)
            }
            StoreConfig::Networked {
                host,
                port,
                user,
                password,
                database,
            } => {
                let mut pg_config = postgres::Config::new();
                pg_config.host(host).port(*port).user(user).dbname(database);
                if let Some(password) = password {
                    pg_config.password(password);
                }
                let client = pg_config.connect(NoTls).map_err(|source| MaintenanceError::Connection {
                    target: target.clone(),
                    source: StoreError::from(source),
                })?;
                Backend::Postgres(client)
            }
        };

        Ok(Self {
            backend: Some(backend),
            kind: store.kind(),
            target,
        })
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Credential-free description of the store, e.g. `sqlite:data/app.sqlite`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    pub(crate) fn backend_mut(&mut self) -> std::result::Result<&mut Backend, StoreError> {
        self.backend.as_mut().ok_or_else(|| StoreError::other("connection is closed"))
    }

    /// Executes one statement.
    ///
    /// Returns the affected-row count for INSERT, UPDATE, DELETE and REPLACE,
    /// `None` for everything else. Statements that produce rows are stepped
    /// to completion and their rows discarded.
    pub fn execute(&mut self, sql: &str) -> std::result::Result<Option<u64>, StoreError> {
        debug!(sql, "executing statement");
        let counts_rows = counts_affected_rows(sql);

        let affected = match self.backend_mut()? {
            Backend::Sqlite(conn) => match conn.execute(sql, []) {
                Ok(changes) => changes as u64,
                Err(rusqlite::Error::ExecuteReturnedResults) => {
                    let mut stmt = conn.prepare(sql)?;
                    let mut rows = stmt.query([])?;
                    while rows.next()?.is_some() {}
                    0
                }
                Err(error) => return Err(error.into()),
            },
            Backend::Postgres(client) => client.execute(sql, &[])?,
        };

        Ok(counts_rows.then_some(affected))
    }

    /// Runs a read query and renders every row as text.
    pub fn query_rows(&mut self, sql: &str) -> std::result::Result<Vec<RowSnapshot>, StoreError> {
        debug!(sql, "querying rows");

        match self.backend_mut()? {
            Backend::Sqlite(conn) => {
                let mut stmt = conn.prepare(sql)?;
                let names: Vec<String> = stmt.column_names().iter().map(|name| name.to_string()).collect();
                let mut rows = stmt.query([])?;
                let mut snapshots = Vec::new();
                while let Some(row) = rows.next()? {
                    let mut columns = Vec::with_capacity(names.len());
                    for (index, name) in names.iter().enumerate() {
                        columns.push((name.clone(), render_sqlite_value(row.get_ref(index)?)));
                    }
                    snapshots.push(RowSnapshot { columns });
                }
                Ok(snapshots)
            }
            Backend::Postgres(client) => {
                let mut snapshots = Vec::new();
                for message in client.simple_query(sql)? {
                    if let SimpleQueryMessage::Row(row) = message {
                        let columns = row
                            .columns()
                            .iter()
                            .enumerate()
                            .map(|(index, column)| (column.name().to_string(), row.get(index).unwrap_or("NULL").to_string()))
                            .collect();
                        snapshots.push(RowSnapshot { columns });
                    }
                }
                Ok(snapshots)
            }
        }
    }

    /// Folds a SQLite write-ahead log back into the main database file, so a
    /// plain copy of that file holds every committed change. No-op for
    /// PostgreSQL and for SQLite stores not in WAL mode.
    pub fn checkpoint(&mut self) -> std::result::Result<(), StoreError> {
        let busy: i64 = match self.backend_mut()? {
            Backend::Sqlite(conn) => conn.query_row(SQLITE_CHECKPOINT, [], |row| row.get(0))?,
            Backend::Postgres(_) => return Ok(()),
        };
        if busy != 0 {
            return Err(StoreError::other("database is busy, write-ahead log not checkpointed"));
        }
        debug!(store = %self.target, "write-ahead log checkpointed");
        Ok(())
    }

    /// Number of rows currently in `table`.
    pub fn count_rows(&mut self, table: &str) -> std::result::Result<u64, StoreError> {
        let sql = format!("SELECT count(*) FROM {}", quote_ident(table));
        debug!(sql = %sql, "counting rows");

        let count: i64 = match self.backend_mut()? {
            Backend::Sqlite(conn) => conn.query_row(&sql, [], |row| row.get(0))?,
            Backend::Postgres(client) => client.query_one(sql.as_str(), &[])?.get(0),
        };
        Ok(count.max(0) as u64)
    }

    /// Releases the connection. Safe to call exactly once.
    pub fn close(&mut self) -> Result<()> {
        let backend = self.backend.take().ok_or(MaintenanceError::AlreadyClosed)?;
        debug!(store = %self.target, "closing connection");

        match backend {
            Backend::Sqlite(conn) => conn.close().map_err(|(_, source)| MaintenanceError::Connection {
                target: self.target.clone(),
                source: StoreError::from(source),
            }),
            Backend::Postgres(client) => client.close().map_err(|source| MaintenanceError::Connection {
                target: self.target.clone(),
                source: StoreError::from(source),
            }),
        }
    }
}

/// Quotes an identifier for both SQLite and PostgreSQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a string literal for both SQLite and PostgreSQL.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn counts_affected_rows(sql: &str) -> bool {
    let keyword = leading_keyword(sql);
    ROW_COUNTING_KEYWORDS.iter().any(|candidate| keyword.eq_ignore_ascii_case(candidate))
}

/// First word of `sql` after any leading `--` and `/* */` comments.
fn leading_keyword(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map(|(_, tail)| tail).unwrap_or("").trim_start();
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/").map(|(_, tail)| tail).unwrap_or("").trim_start();
        } else {
            break;
        }
    }
    rest.split(|c: char| !c.is_ascii_alphabetic()).next().unwrap_or("")
}

fn render_sqlite_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
