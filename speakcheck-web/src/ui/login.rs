//! Entry page with the login form

use super::{escape_html, layout};

/// `GET /` and failed `POST /login`
pub fn login_page(error: Option<&str>) -> String {
    let error_html = error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    let content = format!(
        r#"        <div class="card">
            <h2>Spoken English Assessment</h2>
            <p class="muted">Enter your name and NIK to begin.</p>
            {error_html}
            <form method="post" action="/login">
                <label for="name">Name</label>
                <input id="name" name="name" type="text" autocomplete="name" required>
                <label for="nik">NIK</label>
                <input id="nik" name="nik" type="text" required>
                <br>
                <button type="submit">Start</button>
            </form>
        </div>"#,
        error_html = error_html,
    );

    layout("Login", "", &content)
}
