//! Core library modules for dbkeep.
//!
//! - **Infrastructure**: configuration, error taxonomy, operator messages
//! - **Maintenance**: backups, script splitting and replay, bulk mutations
//! - **Reporting**: per-target outcomes, verification, console rendering

pub mod backfill;
pub mod backup;
pub mod config;
pub mod error;
pub mod messages;
pub mod mutator;
pub mod outcome;
pub mod runner;
pub mod script;
pub mod targets;
pub mod verifier;
pub mod view;
