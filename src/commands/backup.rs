use super::{finish, open_store};
use crate::{
    libs::{
        backup::{enforce, BackupGuard},
        config::{BackupPolicy, Config},
        messages::Message,
        outcome::RunStatus,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use tracing::warn;

/// On-demand backup. A failure is always fatal here, whatever the policy.
pub fn cmd(config: &Config) -> Result<RunStatus> {
    let mut conn = open_store(config)?;
    if let Err(error) = conn.checkpoint() {
        warn!(store = %conn.target(), %error, "checkpoint before backup failed");
    }
    let record = BackupGuard::new(&config.backup_dir).backup(&config.store, "manual");
    finish(conn);
    enforce(&record, BackupPolicy::Require)?;

    match &record.backup_path {
        Some(path) => msg_success!(Message::BackupCreated(path.display().to_string())),
        None => msg_info!(Message::BackupSkippedNetworked(config.store.describe())),
    }
    Ok(RunStatus::Clean)
}
