//! Database access layer for the survey service
//!
//! SQLite via sqlx; the database file is created on first run and the
//! schema is applied idempotently at startup.

use csat_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize database connection and create the schema if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: create the database file if missing
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_survey_responses_table(&pool).await?;

    Ok(pool)
}

/// Create the survey_responses table (idempotent)
///
/// AUTOINCREMENT keeps identifiers unique and never reused, even across
/// bulk deletion.
async fn create_survey_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS survey_responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            company TEXT NOT NULL,
            overall_experience INTEGER NOT NULL,
            service_quality INTEGER NOT NULL,
            timeliness INTEGER NOT NULL,
            communication INTEGER NOT NULL,
            professionalism INTEGER NOT NULL,
            issue_resolution INTEGER NOT NULL,
            ease_of_access INTEGER NOT NULL,
            value_added INTEGER NOT NULL,
            efficiency INTEGER NOT NULL,
            suggestions TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("csat.db");

        let pool = init_database(&db_path).await.expect("should initialize");
        assert!(db_path.exists());

        // Table is queryable and empty
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM survey_responses")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        // Idempotent re-init on an existing file
        pool.close().await;
        init_database(&db_path).await.expect("re-init should succeed");
    }
}
