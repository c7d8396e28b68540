//! Single assessment with its full upstream verdict

use serde_json::Value;

use super::{escape_html, format_score, layout};
use crate::models::AssessmentRecord;

const NAV: &str = r#"<a href="/admin">Back to results</a> | <a href="/logout">Log out</a>"#;

/// `GET /admin/detail/{id}`
pub fn detail_page(record: &AssessmentRecord, raw_response: &Value) -> String {
    let pretty = serde_json::to_string_pretty(raw_response).unwrap_or_else(|_| "{}".to_string());

    let content = format!(
        r#"        <div class="card">
            <h2>{name} <span class="muted">(NIK {nik})</span></h2>
            <p class="muted">Assessment #{id} on {date} UTC, user {user_id}</p>
            <p><strong>Question:</strong> {question}</p>
            <p><strong>Transcript:</strong> {transcript}</p>
            <table>
                <tr><th>Overall</th><td>{overall}</td></tr>
                <tr><th>Pronunciation</th><td>{pron}</td></tr>
                <tr><th>Fluency</th><td>{fluency}</td></tr>
                <tr><th>Grammar</th><td>{grammar}</td></tr>
                <tr><th>Vocabulary</th><td>{vocab}</td></tr>
                <tr><th>IELTS (mock)</th><td>{ielts}</td></tr>
                <tr><th>CEFR (mock)</th><td>{cefr}</td></tr>
                <tr><th>PTE (mock)</th><td>{pte}</td></tr>
                <tr><th>Relevance</th><td>{relevance}</td></tr>
                <tr><th>Feedback</th><td>{feedback}</td></tr>
            </table>
        </div>
        <div class="card">
            <h3>Raw response</h3>
            <pre>{raw}</pre>
        </div>"#,
        name = escape_html(&record.name),
        nik = escape_html(&record.nik),
        id = record.id,
        date = record.assessment_date.format("%Y-%m-%d %H:%M:%S"),
        user_id = escape_html(&record.user_id),
        question = escape_html(&record.question),
        transcript = escape_html(&record.predicted_text),
        overall = format_score(record.overall_score),
        pron = format_score(record.pronunciation_score),
        fluency = format_score(record.fluency_score),
        grammar = format_score(record.grammar_score),
        vocab = format_score(record.vocabulary_score),
        ielts = format_score(record.ielts_prediction),
        cefr = escape_html(&record.cefr_prediction),
        pte = escape_html(&record.pte_prediction),
        relevance = escape_html(&record.content_relevance),
        feedback = escape_html(&record.content_relevance_feedback),
        raw = escape_html(&pretty),
    );

    layout("Assessment detail", NAV, &content)
}
