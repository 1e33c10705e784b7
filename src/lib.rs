//! # dbkeep - back-office database maintenance
//!
//! Maintenance tasks for the shipping back office, run against either an
//! embedded SQLite file or a PostgreSQL server.
//!
//! ## Features
//!
//! - **Backup Guard**: byte-for-byte copy of the database file before anything destructive
//! - **Bulk clear**: delete rows table by table, optionally resetting id sequences
//! - **Script replay**: run maintenance scripts statement by statement, keeping a ledger
//! - **Verification**: row counts and samples after every mutation
//!
//! Every destructive run reports one outcome per target and goes on after
//! individual failures.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbkeep::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     let status = Cli::menu()?;
//!     std::process::exit(status.exit_code().into());
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
