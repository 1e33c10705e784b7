//! Configuration snapshot for one maintenance run.
//!
//! All settings come from environment variables (a `.env` file in the working
//! directory is loaded by `main` before this module reads anything). The
//! snapshot is resolved exactly once, at process start, and handed down as an
//! immutable value. In particular the store kind is decided here and nowhere
//! else: [`StoreConfig`] is an explicit enum, so no call site ever guesses
//! "is this PostgreSQL?" from the presence of other variables.
//!
//! ## Variables
//!
//! | Variable               | Meaning                                   | Default           |
//! |------------------------|-------------------------------------------|-------------------|
//! | `DBKEEP_STORE`         | `sqlite` or `postgres`                    | `sqlite`          |
//! | `DBKEEP_SQLITE_PATH`   | database file of the embedded store       | `database.sqlite` |
//! | `DBKEEP_PG_HOST`       | server host                               | `127.0.0.1`       |
//! | `DBKEEP_PG_PORT`       | server port                               | `5432`            |
//! | `DBKEEP_PG_USER`       | role to connect as                        | `postgres`        |
//! | `DBKEEP_PG_PASSWORD`   | password, never printed                   | none              |
//! | `DBKEEP_PG_DATABASE`   | database name (required for `postgres`)   | none              |
//! | `DBKEEP_BACKUP_DIR`    | backup directory, relative to the store   | `backups`         |
//! | `DBKEEP_BACKUP_POLICY` | `require` aborts on backup failure, `warn` continues | `require` |
//! | `DBKEEP_STRICT`        | exit non-zero when any outcome failed     | `false`           |
//! | `DBKEEP_SAMPLE_LIMIT`  | rows sampled per table after a mutation   | `3`               |

use super::error::{MaintenanceError, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub const ENV_STORE: &str = "DBKEEP_STORE";
pub const ENV_SQLITE_PATH: &str = "DBKEEP_SQLITE_PATH";
pub const ENV_PG_HOST: &str = "DBKEEP_PG_HOST";
pub const ENV_PG_PORT: &str = "DBKEEP_PG_PORT";
pub const ENV_PG_USER: &str = "DBKEEP_PG_USER";
pub const ENV_PG_PASSWORD: &str = "DBKEEP_PG_PASSWORD";
pub const ENV_PG_DATABASE: &str = "DBKEEP_PG_DATABASE";
pub const ENV_BACKUP_DIR: &str = "DBKEEP_BACKUP_DIR";
pub const ENV_BACKUP_POLICY: &str = "DBKEEP_BACKUP_POLICY";
pub const ENV_STRICT: &str = "DBKEEP_STRICT";
pub const ENV_SAMPLE_LIMIT: &str = "DBKEEP_SAMPLE_LIMIT";

const DEFAULT_SQLITE_PATH: &str = "database.sqlite";
const DEFAULT_PG_HOST: &str = "127.0.0.1";
const DEFAULT_PG_PORT: u16 = 5432;
const DEFAULT_PG_USER: &str = "postgres";
const DEFAULT_BACKUP_DIR: &str = "backups";
const DEFAULT_SAMPLE_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// File-based store without a server process.
    Embedded,
    /// Server reached over the network.
    Networked,
}

/// Where the store lives and how to reach it.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    Embedded {
        path: PathBuf,
    },
    Networked {
        host: String,
        port: u16,
        user: String,
        #[serde(skip_serializing)]
        password: Option<String>,
        database: String,
    },
}

impl StoreConfig {
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreConfig::Embedded { .. } => StoreKind::Embedded,
            StoreConfig::Networked { .. } => StoreKind::Networked,
        }
    }

    /// Human-readable location without credentials.
    pub fn describe(&self) -> String {
        match self {
            StoreConfig::Embedded { path } => format!("sqlite:{}", path.display()),
            StoreConfig::Networked {
                host, port, user, database, ..
            } => format!("postgres://{}@{}:{}/{}", user, host, port, database),
        }
    }
}

// Hand-written so the password never reaches logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Embedded { path } => f.debug_struct("Embedded").field("path", path).finish(),
            StoreConfig::Networked {
                host,
                port,
                user,
                password,
                database,
            } => f
                .debug_struct("Networked")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .field("database", database)
                .finish(),
        }
    }
}

/// What happens when the pre-mutation backup cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupPolicy {
    /// Abort before touching any data.
    #[default]
    Require,
    /// Log a warning and continue with the mutation.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub store: StoreConfig,
    /// Backup directory. Relative paths are resolved against the directory of
    /// the database file.
    pub backup_dir: PathBuf,
    pub backup_policy: BackupPolicy,
    /// Turn tolerated per-target failures into a non-zero exit code.
    pub strict: bool,
    pub sample_limit: usize,
}

impl Config {
    /// Reads the snapshot from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the snapshot through `lookup`, which returns the value of a
    /// variable or `None` when unset. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());

        let store = match get(ENV_STORE).as_deref().map(str::to_lowercase).as_deref() {
            None | Some("sqlite") | Some("embedded") => StoreConfig::Embedded {
                path: PathBuf::from(get(ENV_SQLITE_PATH).unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())),
            },
            Some("postgres") | Some("postgresql") | Some("networked") => StoreConfig::Networked {
                host: get(ENV_PG_HOST).unwrap_or_else(|| DEFAULT_PG_HOST.to_string()),
                port: match get(ENV_PG_PORT) {
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| MaintenanceError::Config(format!("{} must be a port number, got '{}'", ENV_PG_PORT, raw)))?,
                    None => DEFAULT_PG_PORT,
                },
                user: get(ENV_PG_USER).unwrap_or_else(|| DEFAULT_PG_USER.to_string()),
                password: get(ENV_PG_PASSWORD),
                database: get(ENV_PG_DATABASE)
                    .ok_or_else(|| MaintenanceError::Config(format!("{} is required for a postgres store", ENV_PG_DATABASE)))?,
            },
            Some(other) => {
                return Err(MaintenanceError::Config(format!(
                    "{} must be 'sqlite' or 'postgres', got '{}'",
                    ENV_STORE, other
                )))
            }
        };

        let backup_policy = match get(ENV_BACKUP_POLICY).as_deref().map(str::to_lowercase).as_deref() {
            None | Some("require") | Some("fatal") => BackupPolicy::Require,
            Some("warn") => BackupPolicy::Warn,
            Some(other) => {
                return Err(MaintenanceError::Config(format!(
                    "{} must be 'require' or 'warn', got '{}'",
                    ENV_BACKUP_POLICY, other
                )))
            }
        };

        let strict = match get(ENV_STRICT) {
            Some(raw) => parse_bool(ENV_STRICT, &raw)?,
            None => false,
        };

        let sample_limit = match get(ENV_SAMPLE_LIMIT) {
            Some(raw) => raw
                .parse()
                .map_err(|_| MaintenanceError::Config(format!("{} must be a non-negative integer, got '{}'", ENV_SAMPLE_LIMIT, raw)))?,
            None => DEFAULT_SAMPLE_LIMIT,
        };

        Ok(Config {
            store,
            backup_dir: PathBuf::from(get(ENV_BACKUP_DIR).unwrap_or_else(|| DEFAULT_BACKUP_DIR.to_string())),
            backup_policy,
            strict,
            sample_limit,
        })
    }

    /// Snapshot for an embedded store at `path` with all other settings at
    /// their defaults.
    pub fn embedded(path: impl Into<PathBuf>) -> Self {
        Config {
            store: StoreConfig::Embedded { path: path.into() },
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            backup_policy: BackupPolicy::default(),
            strict: false,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MaintenanceError::Config(format!("{} must be a boolean, got '{}'", key, raw))),
    }
}
