use super::{finish, open_store};
use crate::{
    libs::{config::Config, messages::Message, outcome::RunStatus, verifier, view::View},
    msg_error, msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Table to read from
    table: String,

    /// Number of rows to show; defaults to DBKEEP_SAMPLE_LIMIT
    #[arg(short, long)]
    limit: Option<usize>,
}

/// Read-only, so no backup is taken and a failed read leaves the exit
/// status alone.
pub fn cmd(args: SampleArgs, config: &Config) -> Result<RunStatus> {
    let limit = args.limit.unwrap_or(config.sample_limit);
    let mut conn = open_store(config)?;

    match verifier::sample(&mut conn, &args.table, limit) {
        Ok(rows) if rows.is_empty() => msg_info!(Message::SampleEmpty(args.table.clone())),
        Ok(rows) => {
            msg_print!(Message::SampleHeader(args.table.clone(), rows.len()));
            View::rows(&rows);
        }
        Err(error) => msg_error!(Message::VerificationFailed(args.table.clone(), error.to_string())),
    }
    finish(conn);

    Ok(RunStatus::Clean)
}
