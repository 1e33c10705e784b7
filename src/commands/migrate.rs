//! Replay of maintenance scripts.
//!
//! The script is split before anything is opened, so a script the tokenizer
//! rejects never costs a backup or touches the store. Statements then run in
//! order, each failure is recorded and the run goes on, and the replay is
//! appended to the run ledger.

use super::{conclude, finish, open_for_mutation};
use crate::{
    db::ledger::record_run,
    libs::{
        config::Config,
        messages::Message,
        outcome::{OperationOutcome, OutcomeSummary, RunStatus},
        runner::run_statements,
        script::split_statements,
        verifier::{check_tables, TableCheck},
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Path of the script; statements are separated by `;`
    file: PathBuf,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    script: &'a str,
    statements: &'a [OperationOutcome],
    verification: &'a [TableCheck],
    summary: OutcomeSummary,
}

pub fn cmd(args: MigrateArgs, config: &Config) -> Result<RunStatus> {
    let script = fs::read_to_string(&args.file).with_context(|| Message::ScriptReadFailed(args.file.display().to_string()))?;
    let name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    replay(config, &name, &script, "migrate", &[], args.json)
}

/// Shared by `migrate` and `backfill`: split, back up, run, record, verify
/// `verify` (when the touched tables are known), report.
pub(crate) fn replay(
    config: &Config,
    name: &str,
    script: &str,
    operation: &str,
    verify: &[String],
    json: bool,
) -> Result<RunStatus> {
    let statements = split_statements(script, config.store.kind())?;
    if statements.is_empty() {
        msg_info!(Message::ScriptEmpty(name.to_string()));
        return Ok(RunStatus::Clean);
    }
    msg_info!(Message::ScriptLoaded(name.to_string(), statements.len()));

    let mut conn = open_for_mutation(config, operation)?;
    let outcomes = run_statements(&mut conn, &statements);
    let summary = OutcomeSummary::of(&outcomes);

    match record_run(&mut conn, name, statements.len(), &summary) {
        Ok(id) => msg_success!(Message::RunRecorded(id)),
        Err(error) => msg_warning!(Message::RunRecordFailed(error.to_string())),
    }
    let checks = check_tables(&mut conn, verify.iter().map(String::as_str), config.sample_limit);
    finish(conn);

    if json {
        View::json(&ReplayOutput {
            script: name,
            statements: &outcomes,
            verification: &checks,
            summary,
        })?;
    } else {
        msg_print!(Message::StatementsHeader(name.to_string()));
        View::outcomes(&outcomes);
        if !checks.is_empty() {
            msg_print!(Message::VerificationHeader);
            View::checks(&checks);
        }
    }

    Ok(conclude(&summary, config))
}
