use super::migrate::replay;
use crate::libs::{backfill::backfill_script, config::Config, outcome::RunStatus};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct BackfillArgs {
    /// Table to extend
    table: String,

    /// Column to add when missing
    column: String,

    /// Column type, passed to the store as written (e.g. TEXT, INTEGER)
    column_type: String,

    /// Value written into rows where the column is NULL
    value: String,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: BackfillArgs, config: &Config) -> Result<RunStatus> {
    let script = backfill_script(&args.table, &args.column, &args.column_type, &args.value)?;
    let name = format!("backfill {}.{}", args.table, args.column);

    replay(config, &name, &script, "backfill", &[args.table], args.json)
}
