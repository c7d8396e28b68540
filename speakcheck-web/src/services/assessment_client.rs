//! Speech-assessment API client
//!
//! Posts a base64 audio clip with a fixed question context to the
//! unscripted speech-assessment endpoint and returns the JSON verdict
//! untouched. Field extraction happens in
//! [`ProficiencyResult`](crate::models::ProficiencyResult).

use axum::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Prompt shown to every test taker and sent as assessment context
pub const QUESTION: &str = "What have you been doing at work this past week?";

/// Grading hint sent alongside [`QUESTION`]
pub const CONTEXT_DESCRIPTION: &str =
    "The user should talk about their work activities from the past week";

/// Browser MediaRecorder output format
const AUDIO_FORMAT: &str = "webm";

const USER_AGENT: &str = concat!("SpeakCheck/", env!("CARGO_PKG_VERSION"));

/// Assessment client errors
#[derive(Debug, Error)]
pub enum AssessmentClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, body kept verbatim
    #[error("API Error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct AssessmentRequest<'a> {
    audio_base64: &'a str,
    audio_format: &'a str,
    context: AssessmentContext<'a>,
}

#[derive(Debug, Serialize)]
struct AssessmentContext<'a> {
    question: &'a str,
    context_description: &'a str,
}

impl<'a> AssessmentRequest<'a> {
    fn new(audio_base64: &'a str) -> Self {
        Self {
            audio_base64,
            audio_format: AUDIO_FORMAT,
            context: AssessmentContext {
                question: QUESTION,
                context_description: CONTEXT_DESCRIPTION,
            },
        }
    }
}

/// Source of proficiency verdicts
///
/// Handlers only see this trait so tests can substitute a canned provider.
#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    /// Assess one recording on behalf of `user_id`, returning the raw JSON response
    async fn assess(&self, audio_base64: &str, user_id: &str)
        -> Result<Value, AssessmentClientError>;
}

/// HTTPS client for the speech-assessment API
pub struct LanguageConfidenceClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl LanguageConfidenceClient {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
    ) -> Result<Self, AssessmentClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AssessmentClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url,
            api_key,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl AssessmentProvider for LanguageConfidenceClient {
    async fn assess(
        &self,
        audio_base64: &str,
        user_id: &str,
    ) -> Result<Value, AssessmentClientError> {
        tracing::debug!(
            user_id = user_id,
            audio_len = audio_base64.len(),
            "Submitting audio for assessment"
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .header("Accept", "application/json")
            .header("api-key", &self.api_key)
            .header("x-user-id", user_id)
            .json(&AssessmentRequest::new(audio_base64))
            .send()
            .await
            .map_err(|e| AssessmentClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssessmentClientError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let verdict: Value = response
            .json()
            .await
            .map_err(|e| AssessmentClientError::Parse(e.to_string()))?;

        tracing::info!(user_id = user_id, "Assessment API call successful");

        Ok(verdict)
    }
}
