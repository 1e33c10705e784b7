use super::{finish, open_store};
use crate::{
    db::inspect::list_tables,
    libs::{config::Config, messages::Message, outcome::RunStatus, view::View},
    msg_info, msg_print,
};
use anyhow::Result;

pub fn cmd(config: &Config) -> Result<RunStatus> {
    let mut conn = open_store(config)?;
    let tables = list_tables(&mut conn);
    finish(conn);
    let tables = tables?;

    if tables.is_empty() {
        msg_info!(Message::NoTablesFound);
    } else {
        msg_print!(Message::TablesHeader(config.store.describe()));
        View::tables(&tables);
    }
    Ok(RunStatus::Clean)
}
