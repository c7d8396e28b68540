//! Assessment records

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::ProficiencyResult;

/// One stored assessment (write-once)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub nik: String,
    pub question: String,
    pub predicted_text: String,
    pub overall_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub ielts_prediction: f64,
    pub cefr_prediction: String,
    pub pte_prediction: String,
    pub content_relevance: String,
    pub content_relevance_feedback: String,
    pub assessment_date: DateTime<Utc>,
    /// Full upstream verdict as JSON text
    pub raw_response: Option<String>,
}

impl AssessmentRecord {
    /// Parsed `raw_response`, or an empty object if absent or unparseable
    pub fn parsed_raw_response(&self) -> Value {
        let Some(raw) = self.raw_response.as_deref() else {
            return Value::Object(Default::default());
        };

        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    assessment_id = self.id,
                    "Stored raw_response is not valid JSON: {}",
                    e
                );
                Value::Object(Default::default())
            }
        }
    }
}

/// Insert payload; the store assigns `id` and `assessment_date`
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssessment {
    pub user_id: String,
    pub name: String,
    pub nik: String,
    pub question: String,
    pub predicted_text: String,
    pub overall_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub ielts_prediction: f64,
    pub cefr_prediction: String,
    pub pte_prediction: String,
    pub content_relevance: String,
    pub content_relevance_feedback: String,
    pub raw_response: String,
}

impl NewAssessment {
    /// Build a record from a verdict and the submitting user's identity
    pub fn from_verdict(
        raw: &Value,
        user_id: Uuid,
        name: &str,
        nik: &str,
        question: &str,
    ) -> serde_json::Result<Self> {
        let result = ProficiencyResult::from_value(raw);

        Ok(Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            nik: nik.to_string(),
            question: question.to_string(),
            predicted_text: result.predicted_text(),
            overall_score: result.overall_score(),
            pronunciation_score: result.pronunciation_score(),
            fluency_score: result.fluency_score(),
            grammar_score: result.grammar_score(),
            vocabulary_score: result.vocabulary_score(),
            ielts_prediction: result.ielts_prediction(),
            cefr_prediction: result.cefr_prediction(),
            pte_prediction: result.pte_prediction(),
            content_relevance: result.content_relevance(),
            content_relevance_feedback: result.content_relevance_feedback(),
            raw_response: serde_json::to_string(raw)?,
        })
    }
}

/// Subset of a record returned to the browser after submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedResult {
    pub predicted_text: String,
    pub overall_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub grammar_score: f64,
    pub vocabulary_score: f64,
    pub ielts_prediction: f64,
    pub cefr_prediction: String,
    pub pte_prediction: String,
    pub content_relevance: String,
    pub content_relevance_feedback: String,
}

impl From<&AssessmentRecord> for SimplifiedResult {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            predicted_text: record.predicted_text.clone(),
            overall_score: record.overall_score,
            pronunciation_score: record.pronunciation_score,
            fluency_score: record.fluency_score,
            grammar_score: record.grammar_score,
            vocabulary_score: record.vocabulary_score,
            ielts_prediction: record.ielts_prediction,
            cefr_prediction: record.cefr_prediction.clone(),
            pte_prediction: record.pte_prediction.clone(),
            content_relevance: record.content_relevance.clone(),
            content_relevance_feedback: record.content_relevance_feedback.clone(),
        }
    }
}
