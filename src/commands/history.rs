use super::{finish, open_store};
use crate::{
    db::ledger,
    libs::{config::Config, messages::Message, outcome::RunStatus, view::View},
    msg_info, msg_print,
};
use anyhow::Result;

pub fn cmd(config: &Config) -> Result<RunStatus> {
    let mut conn = open_store(config)?;
    let entries = ledger::history(&mut conn);
    finish(conn);
    let entries = entries?;

    if entries.is_empty() {
        msg_info!(Message::HistoryEmpty);
    } else {
        msg_print!(Message::HistoryHeader);
        View::history(&entries);
    }
    Ok(RunStatus::Clean)
}
