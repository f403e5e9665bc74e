/// Shared setup for database-backed tests
mod support {
    use migration::MigratorTrait;
    use sea_orm::DatabaseConnection;

    /// Connects and migrates, or returns `None` when the database is unavailable.
    pub async fn setup_test_db() -> Option<DatabaseConnection> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return None;
        }
        let db = match crate::db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return None;
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {}", e);
            return None;
        }
        Some(db)
    }
}
