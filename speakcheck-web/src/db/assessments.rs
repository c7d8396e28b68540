//! Assessment store
//!
//! Records are append-only: this module inserts and reads, nothing else.

use chrono::{DateTime, SecondsFormat, Utc};
use speakcheck_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::models::{AssessmentFilter, AssessmentRecord, NewAssessment};

const SELECT_ASSESSMENTS: &str = "SELECT id, user_id, name, nik, question, predicted_text, \
     overall_score, pronunciation_score, fluency_score, grammar_score, vocabulary_score, \
     ielts_prediction, cefr_prediction, pte_prediction, content_relevance, \
     content_relevance_feedback, assessment_date, raw_response FROM assessments";

/// Insert one assessment, stamped with the current time
pub async fn insert_assessment(pool: &SqlitePool, new: &NewAssessment) -> Result<AssessmentRecord> {
    insert_assessment_at(pool, new, Utc::now()).await
}

/// Insert with an explicit timestamp
///
/// Runs in a transaction: on any error nothing is committed.
pub(crate) async fn insert_assessment_at(
    pool: &SqlitePool,
    new: &NewAssessment,
    assessment_date: DateTime<Utc>,
) -> Result<AssessmentRecord> {
    // Fixed-width UTC text keeps lexical order equal to time order
    let date_text = assessment_date.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO assessments (
            user_id, name, nik, question, predicted_text,
            overall_score, pronunciation_score, fluency_score, grammar_score, vocabulary_score,
            ielts_prediction, cefr_prediction, pte_prediction,
            content_relevance, content_relevance_feedback,
            assessment_date, raw_response
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new.user_id)
    .bind(&new.name)
    .bind(&new.nik)
    .bind(&new.question)
    .bind(&new.predicted_text)
    .bind(new.overall_score)
    .bind(new.pronunciation_score)
    .bind(new.fluency_score)
    .bind(new.grammar_score)
    .bind(new.vocabulary_score)
    .bind(new.ielts_prediction)
    .bind(&new.cefr_prediction)
    .bind(&new.pte_prediction)
    .bind(&new.content_relevance)
    .bind(&new.content_relevance_feedback)
    .bind(&date_text)
    .bind(&new.raw_response)
    .fetch_one(&mut *tx)
    .await?;

    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ASSESSMENTS))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let record = row_to_record(&row)?;

    tx.commit().await?;

    Ok(record)
}

/// Look up one assessment by id
pub async fn get_assessment(pool: &SqlitePool, id: i64) -> Result<Option<AssessmentRecord>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ASSESSMENTS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_record).transpose()
}

/// All assessments matching `filter`, most recent first
pub async fn list_assessments(
    pool: &SqlitePool,
    filter: &AssessmentFilter,
) -> Result<Vec<AssessmentRecord>> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_ASSESSMENTS);
    push_filter_conditions(&mut query, filter);
    query.push(" ORDER BY assessment_date DESC, id DESC");

    let rows = query.build().fetch_all(pool).await?;
    let records = rows
        .iter()
        .map(row_to_record)
        .collect::<Result<Vec<_>>>()?;

    // SQLite's LOWER() and LIKE only fold ASCII, so names are matched here
    Ok(match &filter.name_contains {
        Some(term) => {
            let needle = term.to_lowercase();
            records
                .into_iter()
                .filter(|r| r.name.to_lowercase().contains(&needle))
                .collect()
        }
        None => records,
    })
}

/// Total number of stored assessments
pub async fn count_assessments(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assessments")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Append a `WHERE` clause with one bound predicate per active filter
///
/// The name filter is not part of the SQL; see [`list_assessments`].
fn push_filter_conditions(query: &mut QueryBuilder<'_, Sqlite>, filter: &AssessmentFilter) {
    let mut keyword = " WHERE ";

    if let Some(nik) = &filter.nik_contains {
        query
            .push(keyword)
            .push("nik LIKE ")
            .push_bind(like_pattern(nik))
            .push(" ESCAPE '\\'");
        keyword = " AND ";
    }

    if let Some(start) = filter.start_date {
        query
            .push(keyword)
            .push("date(assessment_date) >= ")
            .push_bind(start.to_string());
        keyword = " AND ";
    }

    if let Some(end) = filter.end_date {
        query
            .push(keyword)
            .push("date(assessment_date) <= ")
            .push_bind(end.to_string());
        keyword = " AND ";
    }

    if let Some(min) = filter.min_score {
        query.push(keyword).push("overall_score >= ").push_bind(min);
        keyword = " AND ";
    }

    if let Some(max) = filter.max_score {
        query.push(keyword).push("overall_score <= ").push_bind(max);
    }
}

/// `%term%` with LIKE wildcards in `term` escaped
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn row_to_record(row: &SqliteRow) -> Result<AssessmentRecord> {
    let date_text: String = row.try_get("assessment_date")?;
    let assessment_date = DateTime::parse_from_rfc3339(&date_text)
        .map_err(|e| Error::Internal(format!("Bad assessment_date '{}': {}", date_text, e)))?
        .with_timezone(&Utc);

    Ok(AssessmentRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        nik: row.try_get("nik")?,
        question: row.try_get("question")?,
        predicted_text: row.try_get("predicted_text")?,
        overall_score: row.try_get("overall_score")?,
        pronunciation_score: row.try_get("pronunciation_score")?,
        fluency_score: row.try_get("fluency_score")?,
        grammar_score: row.try_get("grammar_score")?,
        vocabulary_score: row.try_get("vocabulary_score")?,
        ielts_prediction: row.try_get("ielts_prediction")?,
        cefr_prediction: row.try_get("cefr_prediction")?,
        pte_prediction: row.try_get("pte_prediction")?,
        content_relevance: row.try_get("content_relevance")?,
        content_relevance_feedback: row.try_get("content_relevance_feedback")?,
        assessment_date,
        raw_response: row.try_get("raw_response")?,
    })
}
