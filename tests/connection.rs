#[cfg(test)]
mod tests {
    use dbkeep::db::connection::Connection;
    use dbkeep::libs::config::{StoreConfig, StoreKind};
    use dbkeep::libs::error::{MaintenanceError, StoreErrorKind};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConnectionTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for ConnectionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("database.sqlite");

            let seed = rusqlite::Connection::open(&db_path).unwrap();
            seed.execute_batch(
                "CREATE TABLE clients (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                 INSERT INTO clients (name) VALUES ('Acme Freight'), ('Northwind');",
            )
            .unwrap();

            ConnectionTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    impl ConnectionTestContext {
        fn store(&self) -> StoreConfig {
            StoreConfig::Embedded {
                path: self.db_path.clone(),
            }
        }
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_open_existing_store(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();

        assert_eq!(conn.kind(), StoreKind::Embedded);
        assert!(conn.target().starts_with("sqlite:"));
        assert!(!conn.is_closed());
        assert_eq!(conn.count_rows("clients").unwrap(), 2);
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_missing_file_is_connection_error(ctx: &mut ConnectionTestContext) {
        let store = StoreConfig::Embedded {
            path: ctx.db_path.with_file_name("missing.sqlite"),
        };

        let result = Connection::open(&store);
        assert!(matches!(result, Err(MaintenanceError::Connection { .. })));
        // Opening must not create an empty database in passing.
        assert!(!ctx.db_path.with_file_name("missing.sqlite").exists());
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_non_database_file_is_connection_error(ctx: &mut ConnectionTestContext) {
        let bogus = ctx.db_path.with_file_name("notes.txt");
        fs::write(&bogus, "this is not a database, just some notes about shipments\n".repeat(20)).unwrap();

        let result = Connection::open(&StoreConfig::Embedded { path: bogus });
        assert!(matches!(result, Err(MaintenanceError::Connection { .. })));
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_close_twice_fails(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();

        conn.close().unwrap();
        assert!(conn.is_closed());
        assert!(matches!(conn.close(), Err(MaintenanceError::AlreadyClosed)));
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_execute_after_close_fails(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();
        conn.close().unwrap();

        assert!(conn.execute("DELETE FROM clients").is_err());
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_execute_reports_affected_rows_for_dml_only(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();

        assert_eq!(conn.execute("ALTER TABLE clients ADD COLUMN city TEXT").unwrap(), None);
        assert_eq!(conn.execute("UPDATE clients SET city = 'Riga'").unwrap(), Some(2));
        assert_eq!(conn.execute("SELECT * FROM clients").unwrap(), None);
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_execute_classifies_missing_objects(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();

        let error = conn.execute("DELETE FROM shipments").unwrap_err();
        assert_eq!(error.kind, StoreErrorKind::Missing);

        let error = conn.execute("ALTER TABLE clients ADD COLUMN name TEXT").unwrap_err();
        assert_eq!(error.kind, StoreErrorKind::AlreadyPresent);
    }

    #[test_context(ConnectionTestContext)]
    #[test]
    fn test_query_rows_renders_values(ctx: &mut ConnectionTestContext) {
        let mut conn = Connection::open(&ctx.store()).unwrap();

        let rows = conn.query_rows("SELECT id, name, NULL AS note FROM clients ORDER BY id").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some("1"));
        assert_eq!(rows[0].get("name"), Some("Acme Freight"));
        assert_eq!(rows[0].get("note"), Some("NULL"));
        assert_eq!(rows[1].to_string(), "id=2, name=Northwind, note=NULL");
    }
}
