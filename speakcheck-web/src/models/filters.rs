//! Admin dashboard filters

use chrono::NaiveDate;
use serde::Deserialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query string of `GET /admin`
///
/// Everything arrives as text so malformed values never reject the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQuery {
    pub name_filter: Option<String>,
    pub nik_filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_score: Option<String>,
    pub max_score: Option<String>,
}

/// Validated filter set; every `Some` field is ANDed into the query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentFilter {
    /// Case-insensitive substring of `name`
    pub name_contains: Option<String>,
    /// Substring of `nik`
    pub nik_contains: Option<String>,
    /// Inclusive, by calendar date of `assessment_date`
    pub start_date: Option<NaiveDate>,
    /// Inclusive, by calendar date of `assessment_date`
    pub end_date: Option<NaiveDate>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

impl AssessmentFilter {
    /// Blank text, unparseable dates and non-numeric scores are dropped
    pub fn from_query(query: &AdminQuery) -> Self {
        Self {
            name_contains: non_blank(&query.name_filter),
            nik_contains: non_blank(&query.nik_filter),
            start_date: non_blank(&query.start_date).and_then(|s| parse_date(&s)),
            end_date: non_blank(&query.end_date).and_then(|s| parse_date(&s)),
            min_score: non_blank(&query.min_score).and_then(|s| parse_score(&s)),
            max_score: non_blank(&query.max_score).and_then(|s| parse_score(&s)),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn parse_score(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
