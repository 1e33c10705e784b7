pub mod backfill;
pub mod backup;
pub mod clear;
pub mod history;
pub mod inspect;
pub mod migrate;
pub mod sample;
pub mod sequences;

use crate::{
    db::connection::Connection,
    libs::{
        backup::{enforce, BackupGuard},
        config::Config,
        messages::Message,
        outcome::{OutcomeSummary, RunStatus},
    },
    msg_debug, msg_error, msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::warn;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Delete all rows from the back-office tables")]
    Clear(clear::ClearArgs),
    #[command(about = "Reset id sequences of the back-office tables")]
    ResetSequences(sequences::ResetSequencesArgs),
    #[command(about = "Replay a maintenance script", arg_required_else_help = true)]
    Migrate(migrate::MigrateArgs),
    #[command(about = "Add a column if missing and fill its empty values", arg_required_else_help = true)]
    Backfill(backfill::BackfillArgs),
    #[command(about = "Show a few rows of a table", arg_required_else_help = true)]
    Sample(sample::SampleArgs),
    #[command(about = "Copy the database file to the backup directory")]
    Backup,
    #[command(about = "List tables with their row counts")]
    Inspect,
    #[command(about = "Show replayed maintenance scripts")]
    History,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses the command line, reads the configuration once and runs the
    /// selected task.
    pub fn menu() -> Result<RunStatus> {
        let cli = Self::parse();
        let config = Config::from_env()?;
        cli.run(&config)
    }

    pub fn run(self, config: &Config) -> Result<RunStatus> {
        msg_debug!(format!("configuration: {:?}", config));

        match self.command {
            Commands::Clear(args) => clear::cmd(args, config),
            Commands::ResetSequences(args) => sequences::cmd(args, config),
            Commands::Migrate(args) => migrate::cmd(args, config),
            Commands::Backfill(args) => backfill::cmd(args, config),
            Commands::Sample(args) => sample::cmd(args, config),
            Commands::Backup => backup::cmd(config),
            Commands::Inspect => inspect::cmd(config),
            Commands::History => history::cmd(config),
        }
    }
}

/// Opens the configured store. Nothing destructive happens before this
/// succeeds.
pub(crate) fn open_store(config: &Config) -> Result<Connection> {
    msg_info!(Message::ConnectingTo(config.store.describe()));
    Ok(Connection::open(&config.store)?)
}

/// Opens the store and takes the backup that must precede `operation`.
pub(crate) fn open_for_mutation(config: &Config, operation: &str) -> Result<Connection> {
    let mut conn = open_store(config)?;
    if let Err(error) = conn.checkpoint() {
        warn!(store = %conn.target(), %error, "checkpoint before backup failed");
    }

    let record = BackupGuard::new(&config.backup_dir).backup(&config.store, operation);
    if let Some(path) = &record.backup_path {
        msg_success!(Message::BackupCreated(path.display().to_string()));
    }
    if let Err(error) = enforce(&record, config.backup_policy) {
        msg_info!(Message::BackupRequiredHint);
        return Err(error.into());
    }

    Ok(conn)
}

/// Closes the connection after the work is done. A failure here cannot undo
/// anything, so it is only reported.
pub(crate) fn finish(mut conn: Connection) {
    if let Err(error) = conn.close() {
        msg_warning!(Message::ConnectionCloseFailed(conn.target().to_string(), error.to_string()));
    }
}

/// Prints the closing summary line and maps it to a run status.
pub(crate) fn conclude(summary: &OutcomeSummary, config: &Config) -> RunStatus {
    if summary.is_full_success() {
        msg_success!(Message::AllOperationsSucceeded(summary.total()), true);
    } else {
        msg_warning!(
            Message::PartialSuccess {
                succeeded: summary.succeeded,
                skipped: summary.skipped,
                failed: summary.failed,
            },
            true
        );
    }

    let status = RunStatus::from_summary(summary, config.strict);
    if status == RunStatus::StrictFailure {
        msg_error!(Message::StrictModeFailure(summary.failed));
    }
    status
}

pub(crate) fn confirm(prompt: Message, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
    }
    Ok(confirmed)
}
