//! Database initialization
//!
//! Opens (or creates) the SQLite database and makes sure the
//! `assessments` table exists. Safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Open the database at `db_url` and create tables if needed
pub async fn init_database(db_url: &str) -> Result<SqlitePool> {
    let file_path = database_file_path(db_url);
    let newly_created = file_path.as_ref().map(|p| !p.exists()).unwrap_or(false);

    // Create parent directory if it doesn't exist
    if let Some(parent) = file_path.as_ref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // WAL lets the admin list read while a submission is being written
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    match &file_path {
        Some(path) if newly_created => info!("Initialized new database: {}", path.display()),
        Some(path) => info!("Opened existing database: {}", path.display()),
        None => info!("Opened database: {}", db_url),
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the `assessments` table and its index (idempotent)
///
/// `AUTOINCREMENT` keeps ids monotonic and never reused.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            nik TEXT NOT NULL,
            question TEXT NOT NULL,
            predicted_text TEXT NOT NULL DEFAULT '',
            overall_score REAL NOT NULL DEFAULT 0,
            pronunciation_score REAL NOT NULL DEFAULT 0,
            fluency_score REAL NOT NULL DEFAULT 0,
            grammar_score REAL NOT NULL DEFAULT 0,
            vocabulary_score REAL NOT NULL DEFAULT 0,
            ielts_prediction REAL NOT NULL DEFAULT 0,
            cefr_prediction TEXT NOT NULL DEFAULT '',
            pte_prediction TEXT NOT NULL DEFAULT '',
            content_relevance TEXT NOT NULL DEFAULT '',
            content_relevance_feedback TEXT NOT NULL DEFAULT '',
            assessment_date TEXT NOT NULL,
            raw_response TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assessments_date ON assessments(assessment_date)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Filesystem path named by a `sqlite:` URL, if it names one
fn database_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" || path.starts_with("file:") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
