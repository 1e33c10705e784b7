//! Bulk clear of the back-office tables.
//!
//! Runs the full destructive pipeline: confirm, open, back up, delete rows
//! table by table (optionally resetting sequences), verify what is left,
//! close and summarise.

use super::{conclude, confirm, finish, open_for_mutation};
use crate::{
    libs::{
        config::Config,
        messages::Message,
        mutator::{clear_all, ClearReport},
        outcome::{OutcomeSummary, RunStatus},
        targets,
        verifier::{check_tables, TableCheck},
        view::View,
    },
    msg_print,
};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Comma-separated tables, processed in the given order
    ///
    /// Defaults to the back-office tables, dependants first.
    #[arg(short, long, value_delimiter = ',')]
    tables: Vec<String>,

    /// Reset the id sequence of every table after deleting its rows
    #[arg(long)]
    reset_sequences: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ClearOutput<'a> {
    report: &'a ClearReport,
    verification: &'a [TableCheck],
    summary: OutcomeSummary,
}

pub fn cmd(args: ClearArgs, config: &Config) -> Result<RunStatus> {
    let tables = targets::resolve(&args.tables);
    let names: Vec<String> = tables.iter().map(|table| table.name.clone()).collect();

    if !confirm(Message::ConfirmClear(names.clone(), config.store.describe()), args.yes)? {
        return Ok(RunStatus::Clean);
    }

    let mut conn = open_for_mutation(config, "clear")?;
    let report = clear_all(&mut conn, &tables, args.reset_sequences);
    let checks = check_tables(&mut conn, names.iter().map(String::as_str), config.sample_limit);
    finish(conn);

    let mut summary = OutcomeSummary::default();
    for block in report.blocks() {
        summary.add(block);
    }

    if args.json {
        View::json(&ClearOutput {
            report: &report,
            verification: &checks,
            summary,
        })?;
    } else {
        msg_print!(Message::DeletionsHeader);
        View::outcomes(&report.deletions);
        if let Some(resets) = &report.sequence_resets {
            msg_print!(Message::SequenceResetsHeader);
            View::outcomes(resets);
        }
        msg_print!(Message::VerificationHeader);
        View::checks(&checks);
    }

    Ok(conclude(&summary, config))
}
