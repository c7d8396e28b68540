//! Outbound integrations

pub mod assessment_client;

pub use assessment_client::{
    AssessmentClientError, AssessmentProvider, LanguageConfidenceClient, CONTEXT_DESCRIPTION,
    QUESTION,
};
