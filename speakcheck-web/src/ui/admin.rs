//! Admin dashboard: filter form and result table

use super::{escape_html, format_score, layout};
use crate::models::{AdminQuery, AssessmentRecord};

const NAV: &str = r#"<a href="/admin">All results</a> | <a href="/logout">Log out</a>"#;

/// `GET /admin`
pub fn admin_page(records: &[AssessmentRecord], query: &AdminQuery) -> String {
    let value = |field: &Option<String>| escape_html(field.as_deref().unwrap_or_default());

    let rows: String = records.iter().map(record_row).collect();
    let table = if records.is_empty() {
        r#"<p class="muted">No assessments match.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
                <tr>
                    <th>Date (UTC)</th><th>Name</th><th>NIK</th><th>Overall</th>
                    <th>Pron.</th><th>Fluency</th><th>Grammar</th><th>Vocab.</th>
                    <th>IELTS</th><th>CEFR</th><th>PTE</th><th></th>
                </tr>
{rows}            </table>"#,
            rows = rows
        )
    };

    let content = format!(
        r#"        <div class="card">
            <form method="get" action="/admin" class="filters">
                <div><label for="name_filter">Name</label>
                    <input id="name_filter" name="name_filter" value="{name}"></div>
                <div><label for="nik_filter">NIK</label>
                    <input id="nik_filter" name="nik_filter" value="{nik}"></div>
                <div><label for="start_date">From</label>
                    <input id="start_date" name="start_date" type="date" value="{start}"></div>
                <div><label for="end_date">To</label>
                    <input id="end_date" name="end_date" type="date" value="{end}"></div>
                <div><label for="min_score">Min overall</label>
                    <input id="min_score" name="min_score" size="5" value="{min}"></div>
                <div><label for="max_score">Max overall</label>
                    <input id="max_score" name="max_score" size="5" value="{max}"></div>
                <div><button type="submit">Filter</button></div>
            </form>
        </div>
        <div class="card">
            <p class="muted">{count} result(s)</p>
            {table}
        </div>"#,
        name = value(&query.name_filter),
        nik = value(&query.nik_filter),
        start = value(&query.start_date),
        end = value(&query.end_date),
        min = value(&query.min_score),
        max = value(&query.max_score),
        count = records.len(),
        table = table,
    );

    layout("Admin", NAV, &content)
}

fn record_row(record: &AssessmentRecord) -> String {
    format!(
        r#"                <tr>
                    <td>{date}</td><td>{name}</td><td>{nik}</td><td>{overall}</td>
                    <td>{pron}</td><td>{fluency}</td><td>{grammar}</td><td>{vocab}</td>
                    <td>{ielts}</td><td>{cefr}</td><td>{pte}</td>
                    <td><a href="/admin/detail/{id}">Detail</a></td>
                </tr>
"#,
        date = record.assessment_date.format("%Y-%m-%d %H:%M"),
        name = escape_html(&record.name),
        nik = escape_html(&record.nik),
        overall = format_score(record.overall_score),
        pron = format_score(record.pronunciation_score),
        fluency = format_score(record.fluency_score),
        grammar = format_score(record.grammar_score),
        vocab = format_score(record.vocabulary_score),
        ielts = format_score(record.ielts_prediction),
        cefr = escape_html(&record.cefr_prediction),
        pte = escape_html(&record.pte_prediction),
        id = record.id,
    )
}
