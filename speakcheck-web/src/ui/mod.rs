//! Server-rendered HTML pages
//!
//! Pages are plain `format!` templates sharing one stylesheet. Every value
//! that originates from a user or the assessment service goes through
//! [`escape_html`].

mod admin;
mod assessment;
mod detail;
mod login;

pub use admin::admin_page;
pub use assessment::assessment_page;
pub use detail::detail_page;
pub use login::login_page;

const STYLES: &str = r#"
    * { box-sizing: border-box; }
    body {
        font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
        background-color: #1a1a1a;
        color: #e0e0e0;
        line-height: 1.6;
        margin: 0;
    }
    header {
        background-color: #2a2a2a;
        border-bottom: 1px solid #3a3a3a;
        padding: 16px 20px;
        display: flex;
        justify-content: space-between;
        align-items: center;
    }
    header h1 { font-size: 22px; margin: 0; color: #4a9eff; }
    header a { color: #888; }
    main { padding: 20px; max-width: 1100px; margin: 0 auto; }
    .card {
        background: #242424;
        border: 1px solid #3a3a3a;
        border-radius: 8px;
        padding: 20px;
        margin-bottom: 20px;
    }
    label { display: block; margin: 8px 0 4px; color: #aaa; }
    input {
        background: #1a1a1a;
        color: #e0e0e0;
        border: 1px solid #3a3a3a;
        border-radius: 4px;
        padding: 6px 8px;
    }
    button {
        background: #4a9eff;
        color: #fff;
        border: none;
        border-radius: 4px;
        padding: 8px 16px;
        cursor: pointer;
        margin-top: 12px;
    }
    button:disabled { background: #555; cursor: default; }
    .error { color: #ff6b6b; }
    .muted { color: #888; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #333; }
    th { color: #aaa; font-weight: 600; }
    pre { white-space: pre-wrap; word-break: break-word; background: #111; padding: 12px; }
    .filters { display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end; }
"#;

/// Wrap page content in the shared document shell
fn layout(title: &str, nav: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - SpeakCheck</title>
    <style>{styles}</style>
</head>
<body>
    <header>
        <h1>SpeakCheck</h1>
        <nav>{nav}</nav>
    </header>
    <main>
{content}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
        styles = STYLES,
        nav = nav,
        content = content,
    )
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Scores render with at most one decimal
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert(\"x\")</script> & 'y'"),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#x27;y&#x27;"
        );
        assert_eq!(escape_html("Budi Santoso"), "Budi Santoso");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(80.0), "80");
        assert_eq!(format_score(82.34), "82.3");
        assert_eq!(format_score(6.5), "6.5");
    }
}
