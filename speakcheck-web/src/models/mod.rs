//! Data models

mod assessment;
mod filters;
mod proficiency;

pub use assessment::{AssessmentRecord, NewAssessment, SimplifiedResult};
pub use filters::{AdminQuery, AssessmentFilter};
pub use proficiency::{
    Metadata, OverallSection, Prediction, ProficiencyResult, ProficiencyScores, ScoreSection,
};
