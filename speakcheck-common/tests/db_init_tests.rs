//! Tests for database initialization
//!
//! - Database file and parent folder are created on first run
//! - Re-opening an existing database is a no-op for the schema
//! - The assessments table has the expected columns

use speakcheck_common::db::{create_schema, init_database};
use sqlx::Row;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("speakcheck.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let result = init_database(&db_url).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("speakcheck.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool1 = init_database(&db_url).await.unwrap();
    sqlx::query(
        "INSERT INTO assessments (user_id, name, nik, question, assessment_date)
         VALUES ('u', 'n', 'k', 'q', '2024-01-01T00:00:00.000Z')",
    )
    .execute(&pool1)
    .await
    .unwrap();
    pool1.close().await;

    // Second open must keep existing rows
    let pool2 = init_database(&db_url).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assessments")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_schema_columns() {
    let pool = init_database("sqlite::memory:").await.unwrap();
    create_schema(&pool).await.expect("schema creation is idempotent");

    let rows = sqlx::query("SELECT name FROM pragma_table_info('assessments')")
        .fetch_all(&pool)
        .await
        .unwrap();
    let columns: Vec<String> = rows.iter().map(|r| r.get::<String, _>(0)).collect();

    for expected in [
        "id",
        "user_id",
        "name",
        "nik",
        "question",
        "predicted_text",
        "overall_score",
        "pronunciation_score",
        "fluency_score",
        "grammar_score",
        "vocabulary_score",
        "ielts_prediction",
        "cefr_prediction",
        "pte_prediction",
        "content_relevance",
        "content_relevance_feedback",
        "assessment_date",
        "raw_response",
    ] {
        assert!(columns.contains(&expected.to_string()), "missing column {}", expected);
    }
}
