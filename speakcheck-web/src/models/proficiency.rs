//! Schema of the speech-assessment verdict
//!
//! The upstream schema is not ours, so every field is optional and every
//! accessor defaults on absence: missing numbers read as `0.0`, missing text
//! as `""`. Values of an unexpected type are treated as absent rather than
//! failing the whole verdict.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parsed verdict
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProficiencyResult {
    #[serde(default, deserialize_with = "lenient")]
    pub overall: Option<OverallSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub pronunciation: Option<ScoreSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub fluency: Option<ScoreSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub grammar: Option<ScoreSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub vocabulary: Option<ScoreSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverallSection {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub english_proficiency_scores: Option<ProficiencyScores>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreSection {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub overall_score: Option<f64>,
}

/// Mock exam-scale predictions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProficiencyScores {
    #[serde(default, deserialize_with = "lenient")]
    pub mock_ielts: Option<Prediction>,
    #[serde(default, deserialize_with = "lenient")]
    pub mock_cefr: Option<Prediction>,
    #[serde(default, deserialize_with = "lenient")]
    pub mock_pte: Option<Prediction>,
}

/// IELTS predictions are numeric, CEFR and PTE are labels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub prediction: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub predicted_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_relevance: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_relevance_feedback: Option<String>,
}

impl ProficiencyResult {
    /// Extract from a raw verdict; a non-object verdict yields all defaults
    pub fn from_value(raw: &Value) -> Self {
        match Self::deserialize(raw) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Unrecognized assessment verdict shape: {}", e);
                Self::default()
            }
        }
    }

    pub fn overall_score(&self) -> f64 {
        self.overall
            .as_ref()
            .and_then(|o| o.overall_score)
            .unwrap_or(0.0)
    }

    pub fn pronunciation_score(&self) -> f64 {
        section_score(&self.pronunciation)
    }

    pub fn fluency_score(&self) -> f64 {
        section_score(&self.fluency)
    }

    pub fn grammar_score(&self) -> f64 {
        section_score(&self.grammar)
    }

    pub fn vocabulary_score(&self) -> f64 {
        section_score(&self.vocabulary)
    }

    pub fn ielts_prediction(&self) -> f64 {
        self.prediction(|s| &s.mock_ielts)
            .and_then(value_as_f64)
            .unwrap_or(0.0)
    }

    pub fn cefr_prediction(&self) -> String {
        self.prediction(|s| &s.mock_cefr)
            .and_then(value_as_string)
            .unwrap_or_default()
    }

    pub fn pte_prediction(&self) -> String {
        self.prediction(|s| &s.mock_pte)
            .and_then(value_as_string)
            .unwrap_or_default()
    }

    pub fn predicted_text(&self) -> String {
        self.metadata_field(|m| &m.predicted_text)
    }

    pub fn content_relevance(&self) -> String {
        self.metadata_field(|m| &m.content_relevance)
    }

    pub fn content_relevance_feedback(&self) -> String {
        self.metadata_field(|m| &m.content_relevance_feedback)
    }

    fn prediction<F>(&self, pick: F) -> Option<&Value>
    where
        F: Fn(&ProficiencyScores) -> &Option<Prediction>,
    {
        let scores = self.overall.as_ref()?.english_proficiency_scores.as_ref()?;
        pick(scores).as_ref()?.prediction.as_ref()
    }

    fn metadata_field<F>(&self, pick: F) -> String
    where
        F: Fn(&Metadata) -> &Option<String>,
    {
        self.metadata
            .as_ref()
            .and_then(|m| pick(m).clone())
            .unwrap_or_default()
    }
}

fn section_score(section: &Option<ScoreSection>) -> f64 {
    section
        .as_ref()
        .and_then(|s| s.overall_score)
        .unwrap_or(0.0)
}

/// Finite number; "NaN" and "inf" strings count as absent
fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Nested section; anything that is not the expected object is dropped
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Number, or a string holding one
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

/// String, or a scalar rendered as one
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_string(&value))
}
