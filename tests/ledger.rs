#[cfg(test)]
mod tests {
    use dbkeep::db::connection::Connection;
    use dbkeep::db::inspect::list_tables;
    use dbkeep::db::ledger::{history, record_run};
    use dbkeep::libs::config::StoreConfig;
    use dbkeep::libs::outcome::{OperationOutcome, OutcomeSummary};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct LedgerTestContext {
        _temp_dir: TempDir,
        conn: Connection,
    }

    impl TestContext for LedgerTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("database.sqlite");

            let seed = rusqlite::Connection::open(&db_path).unwrap();
            seed.execute_batch(
                "CREATE TABLE clients (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
                 INSERT INTO clients (name) VALUES ('a'), ('b');
                 CREATE TABLE payments (id INTEGER PRIMARY KEY, amount INTEGER);",
            )
            .unwrap();
            seed.close().unwrap();

            let conn = Connection::open(&StoreConfig::Embedded { path: db_path }).unwrap();
            LedgerTestContext {
                _temp_dir: temp_dir,
                conn,
            }
        }
    }

    #[test_context(LedgerTestContext)]
    #[test]
    fn test_history_of_fresh_store_is_empty(ctx: &mut LedgerTestContext) {
        assert!(history(&mut ctx.conn).unwrap().is_empty());
    }

    #[test_context(LedgerTestContext)]
    #[test]
    fn test_runs_are_recorded_in_order(ctx: &mut LedgerTestContext) {
        let summary = OutcomeSummary::of(&[
            OperationOutcome::succeeded("#1 ALTER TABLE x ADD COLUMN y", None),
            OperationOutcome::skipped("#2 DELETE FROM shipments", "no such table: shipments"),
        ]);

        let first = record_run(&mut ctx.conn, "add-tracking-code.sql", 2, &summary).unwrap();
        let second = record_run(&mut ctx.conn, "add-tracking-code.sql", 2, &OutcomeSummary::default()).unwrap();
        assert!(second > first);

        let entries = history(&mut ctx.conn).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first);
        assert_eq!(entries[0].script, "add-tracking-code.sql");
        assert_eq!(entries[0].statements, 2);
        assert_eq!((entries[0].succeeded, entries[0].skipped, entries[0].failed), (1, 1, 0));
        assert!(chrono::DateTime::parse_from_rfc3339(&entries[0].applied_at).is_ok());
        assert_eq!(entries[1].id, second);
    }

    #[test_context(LedgerTestContext)]
    #[test]
    fn test_inspect_lists_user_tables_with_counts(ctx: &mut LedgerTestContext) {
        let tables = list_tables(&mut ctx.conn).unwrap();
        let listed: Vec<(&str, Option<u64>)> = tables.iter().map(|table| (table.name.as_str(), table.rows)).collect();

        // sqlite_sequence exists because of AUTOINCREMENT but is internal.
        assert_eq!(listed, vec![("clients", Some(2)), ("payments", Some(0))]);
    }

    #[test_context(LedgerTestContext)]
    #[test]
    fn test_inspect_includes_ledger_once_created(ctx: &mut LedgerTestContext) {
        record_run(&mut ctx.conn, "noop.sql", 0, &OutcomeSummary::default()).unwrap();

        let tables = list_tables(&mut ctx.conn).unwrap();
        assert!(tables
            .iter()
            .any(|table| table.name == "dbkeep_runs" && table.rows == Some(1)));
    }
}
