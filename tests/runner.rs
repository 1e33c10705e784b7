#[cfg(test)]
mod tests {
    use dbkeep::db::connection::Connection;
    use dbkeep::libs::backfill::backfill_script;
    use dbkeep::libs::config::StoreConfig;
    use dbkeep::libs::error::MaintenanceError;
    use dbkeep::libs::outcome::{OutcomeStatus, OutcomeSummary};
    use dbkeep::libs::runner::run_script;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RunnerTestContext {
        _temp_dir: TempDir,
        conn: Connection,
    }

    impl TestContext for RunnerTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("database.sqlite");

            let seed = rusqlite::Connection::open(&db_path).unwrap();
            seed.execute_batch(
                "CREATE TABLE x (id INTEGER PRIMARY KEY, label TEXT);
                 INSERT INTO x (label) VALUES ('a'), ('b'), ('c');
                 CREATE TABLE clients (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                 INSERT INTO clients (id, name) VALUES (1, 'Acme Freight'), (2, 'Northwind');",
            )
            .unwrap();
            seed.close().unwrap();

            let conn = Connection::open(&StoreConfig::Embedded { path: db_path }).unwrap();
            RunnerTestContext {
                _temp_dir: temp_dir,
                conn,
            }
        }
    }

    fn statuses(outcomes: &[dbkeep::libs::outcome::OperationOutcome]) -> Vec<OutcomeStatus> {
        outcomes.iter().map(|outcome| outcome.status).collect()
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_add_column_then_delete_nulls(ctx: &mut RunnerTestContext) {
        let script = "ALTER TABLE x ADD COLUMN y; DELETE FROM x WHERE y IS NULL";

        let outcomes = run_script(&mut ctx.conn, script).unwrap();
        assert_eq!(statuses(&outcomes), vec![OutcomeStatus::Succeeded, OutcomeStatus::Succeeded]);
        assert_eq!(outcomes[1].affected_count, Some(3));
        assert_eq!(ctx.conn.count_rows("x").unwrap(), 0);
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_replay_treats_existing_column_as_skip(ctx: &mut RunnerTestContext) {
        let script = "ALTER TABLE x ADD COLUMN y;\nDELETE FROM x WHERE y IS NULL;\n";
        run_script(&mut ctx.conn, script).unwrap();

        let outcomes = run_script(&mut ctx.conn, script).unwrap();
        assert_eq!(statuses(&outcomes), vec![OutcomeStatus::SkippedNotFound, OutcomeStatus::Succeeded]);
        assert_eq!(outcomes[1].affected_count, Some(0));
        assert!(OutcomeSummary::of(&outcomes).is_full_success());
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_commented_statement_reports_affected_rows(ctx: &mut RunnerTestContext) {
        ctx.conn.execute("UPDATE x SET label = NULL WHERE id <= 2").unwrap();
        let script = "-- purge nulls\nDELETE FROM x WHERE label IS NULL;\n/* keep the rest */\nUPDATE x SET label = 'kept';";

        let outcomes = run_script(&mut ctx.conn, script).unwrap();
        assert_eq!(outcomes[0].target, "#1 DELETE FROM x WHERE label IS NULL");
        assert_eq!(outcomes[0].affected_count, Some(2));
        assert_eq!(outcomes[1].target, "#2 UPDATE x SET label = 'kept'");
        assert_eq!(outcomes[1].affected_count, Some(1));
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_failing_statement_does_not_stop_the_rest(ctx: &mut RunnerTestContext) {
        let script = "UPDATE clients SET name = 'Acme Logistics' WHERE id = 1;
            INSERT INTO clients (id, name) VALUES (1, 'Duplicate');
            DELETE FROM clients WHERE id = 2;";

        let outcomes = run_script(&mut ctx.conn, script).unwrap();
        assert_eq!(
            statuses(&outcomes),
            vec![OutcomeStatus::Succeeded, OutcomeStatus::Failed, OutcomeStatus::Succeeded]
        );
        assert!(outcomes[0].target.starts_with("#1 UPDATE clients"));
        assert!(outcomes[1].error_message.as_deref().unwrap().contains("UNIQUE"));
        assert_eq!(ctx.conn.count_rows("clients").unwrap(), 1);
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_missing_table_is_skipped(ctx: &mut RunnerTestContext) {
        let outcomes = run_script(&mut ctx.conn, "DELETE FROM shipments; DELETE FROM x").unwrap();

        assert_eq!(statuses(&outcomes), vec![OutcomeStatus::SkippedNotFound, OutcomeStatus::Succeeded]);
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_empty_script_runs_nothing(ctx: &mut RunnerTestContext) {
        assert!(run_script(&mut ctx.conn, "").unwrap().is_empty());
        assert!(run_script(&mut ctx.conn, " ;\n-- only a comment\n;").unwrap().is_empty());
        assert_eq!(ctx.conn.count_rows("x").unwrap(), 3);
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_unreadable_script_runs_nothing(ctx: &mut RunnerTestContext) {
        let result = run_script(&mut ctx.conn, "DELETE FROM x; UPDATE clients SET name = 'oops");

        assert!(matches!(result, Err(MaintenanceError::Script(_))));
        assert_eq!(ctx.conn.count_rows("x").unwrap(), 3);
    }

    #[test_context(RunnerTestContext)]
    #[test]
    fn test_backfill_fills_only_empty_values(ctx: &mut RunnerTestContext) {
        ctx.conn.execute("ALTER TABLE clients ADD COLUMN tier TEXT").unwrap();
        ctx.conn.execute("UPDATE clients SET tier = 'gold' WHERE id = 1").unwrap();

        let script = backfill_script("clients", "tier", "TEXT", "standard").unwrap();
        let outcomes = run_script(&mut ctx.conn, &script).unwrap();
        assert_eq!(statuses(&outcomes), vec![OutcomeStatus::SkippedNotFound, OutcomeStatus::Succeeded]);
        assert_eq!(outcomes[1].affected_count, Some(1));

        let rows = ctx.conn.query_rows("SELECT tier FROM clients ORDER BY id").unwrap();
        let tiers: Vec<&str> = rows.iter().filter_map(|row| row.get("tier")).collect();
        assert_eq!(tiers, vec!["gold", "standard"]);
    }
}
