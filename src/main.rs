use dbkeep::{
    commands::Cli,
    libs::messages::{macros::is_debug_mode, Message},
    msg_error,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbkeep=debug")))
            .with_writer(std::io::stderr)
            .init();
    }

    match Cli::menu() {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(error) => {
            msg_error!(Message::RunAborted(format!("{:#}", error)));
            ExitCode::from(1)
        }
    }
}
