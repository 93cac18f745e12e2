//! Opening the trade store and keeping its schema current.

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Stored in `PRAGMA user_version` once `schema.sql` has been applied.
pub const SCHEMA_VERSION: i64 = 1;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the trade store at `db_path` and apply the schema.
///
/// Refuses a store written by a newer schema version.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    let found = schema_version(&pool).await?;
    if found > SCHEMA_VERSION {
        return Err(sqlx::Error::Configuration(
            format!(
                "trade store at {} has schema version {}, newer than {}",
                db_path, found, SCHEMA_VERSION
            )
            .into(),
        ));
    }
    apply_schema(&pool).await?;

    info!(path = %db_path, version = SCHEMA_VERSION, "trade store ready");
    Ok(pool)
}

/// The statements are all `IF NOT EXISTS`, so reapplying is harmless.
async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in include_str!("schema.sql").split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
    }
    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    debug!(version = SCHEMA_VERSION, "schema applied");
    Ok(())
}

pub async fn schema_version(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("PRAGMA user_version").fetch_one(pool).await?;
    row.try_get(0)
}
