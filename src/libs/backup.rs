//! Pre-mutation backups of file-based stores.
//!
//! Before a destructive operation the database file is copied byte for byte to
//! `<store dir>/<backup dir>/<stem>-backup-before-<operation><.ext>`. The backup
//! directory is created on demand. A networked store has no file to copy; the
//! guard returns a record without a backup path and the run proceeds.
//!
//! The copy covers the main database file only. Callers holding a connection
//! checkpoint a write-ahead log first (`Connection::checkpoint`), otherwise
//! changes still sitting in `-wal` are missing from the backup.
//!
//! The guard itself never fails: the outcome of the attempt, including the
//! error, lives in the [`BackupRecord`]. Whether a failed attempt stops the run
//! is decided by [`enforce`] under the configured [`BackupPolicy`].

use super::config::{BackupPolicy, StoreConfig};
use super::error::{MaintenanceError, Result};
use super::messages::Message;
use crate::{msg_debug, msg_warning};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKUP_MARKER: &str = "-backup-before-";

/// One backup attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupRecord {
    /// Database file that was copied; `None` for a networked store.
    pub source_path: Option<PathBuf>,
    /// Written copy; `None` when skipped or failed.
    pub backup_path: Option<PathBuf>,
    pub created_at: DateTime<Local>,
    pub error: Option<String>,
}

impl BackupRecord {
    pub fn is_skipped(&self) -> bool {
        self.source_path.is_none()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

pub struct BackupGuard {
    dir: PathBuf,
}

impl BackupGuard {
    /// `dir` is used as-is when absolute, otherwise next to the database file.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Backs up the configured store ahead of `operation`.
    pub fn backup(&self, store: &StoreConfig, operation: &str) -> BackupRecord {
        match store {
            StoreConfig::Embedded { path } => self.backup_file(path, operation),
            StoreConfig::Networked { .. } => {
                msg_debug!(Message::BackupSkippedNetworked(store.describe()));
                BackupRecord {
                    source_path: None,
                    backup_path: None,
                    created_at: Local::now(),
                    error: None,
                }
            }
        }
    }

    /// Destination of the backup of `source` taken before `operation`.
    pub fn backup_path_for(&self, source: &Path, operation: &str) -> PathBuf {
        let parent = source.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let dir = if self.dir.is_absolute() { self.dir.clone() } else { parent.join(&self.dir) };

        let stem = source.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
        let file_name = match source.extension() {
            Some(ext) => format!("{}{}{}.{}", stem, BACKUP_MARKER, operation, ext.to_string_lossy()),
            None => format!("{}{}{}", stem, BACKUP_MARKER, operation),
        };
        dir.join(file_name)
    }

    pub fn backup_file(&self, source: &Path, operation: &str) -> BackupRecord {
        let created_at = Local::now();
        let destination = self.backup_path_for(source, operation);

        let attempt = || -> std::io::Result<()> {
            if !source.is_file() {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "source is not a regular file"));
            }
            if let Some(dir) = destination.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::copy(source, &destination)?;
            Ok(())
        };

        match attempt() {
            Ok(()) => BackupRecord {
                source_path: Some(source.to_path_buf()),
                backup_path: Some(destination),
                created_at,
                error: None,
            },
            Err(error) => BackupRecord {
                source_path: Some(source.to_path_buf()),
                backup_path: None,
                created_at,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Applies `policy` to a finished attempt: a failure is a warning under
/// [`BackupPolicy::Warn`] and an error under [`BackupPolicy::Require`].
pub fn enforce(record: &BackupRecord, policy: BackupPolicy) -> Result<()> {
    let Some(message) = &record.error else {
        return Ok(());
    };
    let path = record.source_path.clone().unwrap_or_default();

    match policy {
        BackupPolicy::Warn => {
            msg_warning!(Message::BackupFailedContinuing(path.display().to_string(), message.clone()));
            Ok(())
        }
        BackupPolicy::Require => Err(MaintenanceError::Backup {
            path,
            message: message.clone(),
        }),
    }
}
