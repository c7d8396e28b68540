//! Recording page
//!
//! Captures microphone audio with MediaRecorder (webm), base64-encodes it
//! and posts `{audio_base64}` to `/submit_assessment`.

use super::{escape_html, layout};
use crate::services::QUESTION;

const RECORDER_JS: &str = r#"
(() => {
    const startBtn = document.getElementById('start');
    const stopBtn = document.getElementById('stop');
    const statusEl = document.getElementById('status');
    const resultEl = document.getElementById('result');
    let recorder = null;
    let chunks = [];

    const show = (id, value) => { document.getElementById(id).textContent = value; };

    startBtn.addEventListener('click', async () => {
        resultEl.hidden = true;
        try {
            const stream = await navigator.mediaDevices.getUserMedia({ audio: true });
            recorder = new MediaRecorder(stream, { mimeType: 'audio/webm' });
            chunks = [];
            recorder.ondataavailable = (e) => { if (e.data.size > 0) chunks.push(e.data); };
            recorder.onstop = () => {
                stream.getTracks().forEach((t) => t.stop());
                submit(new Blob(chunks, { type: 'audio/webm' }));
            };
            recorder.start();
            startBtn.disabled = true;
            stopBtn.disabled = false;
            statusEl.textContent = 'Recording...';
        } catch (err) {
            statusEl.textContent = 'Microphone unavailable: ' + err;
        }
    });

    stopBtn.addEventListener('click', () => {
        if (recorder && recorder.state === 'recording') recorder.stop();
        stopBtn.disabled = true;
        statusEl.textContent = 'Uploading and assessing...';
    });

    function submit(blob) {
        const reader = new FileReader();
        reader.onloadend = async () => {
            const audio_base64 = reader.result.split(',')[1];
            try {
                const resp = await fetch('/submit_assessment', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ audio_base64 }),
                });
                const data = await resp.json();
                if (resp.status === 401) {
                    window.location.href = '/';
                    return;
                }
                if (!resp.ok || !data.success) {
                    statusEl.textContent = 'Error: ' + (data.error || resp.status);
                } else {
                    const r = data.results;
                    show('overall', r.overall_score);
                    show('pronunciation', r.pronunciation_score);
                    show('fluency', r.fluency_score);
                    show('grammar', r.grammar_score);
                    show('vocabulary', r.vocabulary_score);
                    show('ielts', r.ielts_prediction);
                    show('cefr', r.cefr_prediction);
                    show('pte', r.pte_prediction);
                    show('transcript', r.predicted_text);
                    show('relevance', r.content_relevance);
                    show('feedback', r.content_relevance_feedback);
                    resultEl.hidden = false;
                    statusEl.textContent = 'Done.';
                }
            } catch (err) {
                statusEl.textContent = 'Request failed: ' + err;
            }
            startBtn.disabled = false;
        };
        reader.readAsDataURL(blob);
    }
})();
"#;

/// `GET /assessment`
pub fn assessment_page(name: &str, nik: &str) -> String {
    let content = format!(
        r#"        <div class="card">
            <p class="muted">Signed in as <strong>{name}</strong> (NIK {nik})</p>
            <h2>{question}</h2>
            <p>Press start, answer in English, then press stop.</p>
            <button id="start">Start recording</button>
            <button id="stop" disabled>Stop</button>
            <p id="status" class="muted"></p>
        </div>
        <div class="card" id="result" hidden>
            <h2>Your results</h2>
            <table>
                <tr><th>Overall</th><td id="overall"></td></tr>
                <tr><th>Pronunciation</th><td id="pronunciation"></td></tr>
                <tr><th>Fluency</th><td id="fluency"></td></tr>
                <tr><th>Grammar</th><td id="grammar"></td></tr>
                <tr><th>Vocabulary</th><td id="vocabulary"></td></tr>
                <tr><th>IELTS (mock)</th><td id="ielts"></td></tr>
                <tr><th>CEFR (mock)</th><td id="cefr"></td></tr>
                <tr><th>PTE (mock)</th><td id="pte"></td></tr>
                <tr><th>Transcript</th><td id="transcript"></td></tr>
                <tr><th>Relevance</th><td id="relevance"></td></tr>
                <tr><th>Feedback</th><td id="feedback"></td></tr>
            </table>
        </div>
        <script>{script}</script>"#,
        name = escape_html(name),
        nik = escape_html(nik),
        question = escape_html(QUESTION),
        script = RECORDER_JS,
    );

    layout("Assessment", r#"<a href="/logout">Log out</a>"#, &content)
}
