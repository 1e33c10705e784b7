use super::{conclude, confirm, finish, open_for_mutation};
use crate::{
    libs::{
        config::Config,
        messages::Message,
        mutator::reset_all,
        outcome::{OutcomeSummary, RunStatus},
        targets,
        view::View,
    },
    msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ResetSequencesArgs {
    /// Comma-separated tables, processed in the given order
    #[arg(short, long, value_delimiter = ',')]
    tables: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: ResetSequencesArgs, config: &Config) -> Result<RunStatus> {
    let tables = targets::resolve(&args.tables);
    let names: Vec<String> = tables.iter().map(|table| table.name.clone()).collect();

    if !confirm(Message::ConfirmResetSequences(names, config.store.describe()), args.yes)? {
        return Ok(RunStatus::Clean);
    }

    let mut conn = open_for_mutation(config, "reset")?;
    let outcomes = reset_all(&mut conn, &tables);
    finish(conn);

    let summary = OutcomeSummary::of(&outcomes);
    if args.json {
        View::json(&outcomes)?;
    } else {
        msg_print!(Message::SequenceResetsHeader);
        View::outcomes(&outcomes);
    }

    Ok(conclude(&summary, config))
}
