use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::errors::{FoodgramError, Result};
use migration::{Migrator, MigratorTrait};

/// Open a SQLite file, creating it when missing.
///
/// Foreign keys are enforced per connection; cart, favorite and
/// subscription rows rely on them.
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            FoodgramError::database_config(format!("Invalid SQLite URL '{}': {}", database_url, e))
        })?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .pragma("temp_store", "memory");

    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        FoodgramError::database_connection(format!(
            "Cannot open SQLite database '{}': {}",
            database_url, e
        ))
    })?;

    debug!("SQLite pool ready for {}", database_url);
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Pooled MySQL or PostgreSQL connection.
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        FoodgramError::database_connection(format!(
            "Cannot connect to {} (pool of {}): {}",
            backend_name, pool_size, e
        ))
    })
}

/// Bring the schema up to date. Already applied migrations are skipped.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| FoodgramError::database_operation(format!("Schema migration failed: {}", e)))?;

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_open_failure_names_the_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}",
            dir.path().join("no/such/dir/foodgram.db").display()
        );

        let err = connect_sqlite(&url).await.unwrap_err();
        assert!(matches!(err, FoodgramError::DatabaseConnection(_)));
        assert!(err.message().starts_with("Cannot open SQLite database"));
        assert!(err.message().contains("foodgram.db"));
    }

    #[tokio::test]
    async fn test_migrations_run_twice() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("schema.db").display());

        let db = connect_sqlite(&url).await.unwrap();
        run_migrations(&db).await.unwrap();
        run_migrations(&db).await.unwrap();
    }
}
