//! Store access layer.
//!
//! Wraps the two supported stores, SQLite as the embedded file database and
//! PostgreSQL as the networked server, behind one [`connection::Connection`]
//! type. Code above this layer never talks to a driver directly and never
//! needs to know which store it runs against, except where SQL genuinely
//! differs (sequence resets, catalog queries, the run ledger).

/// Connection provider: open, execute, query, close.
pub mod connection;

/// Table listing with row counts.
pub mod inspect;

/// Tracking table of replayed maintenance scripts.
pub mod ledger;
