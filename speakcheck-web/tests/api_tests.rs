//! Integration tests for speakcheck-web HTTP endpoints
//!
//! Tests cover:
//! - Login gate (validation, admin sentinel, fresh user ids)
//! - Assessment submission (auth, bad input, upstream failure, persistence)
//! - Admin dashboard filtering and ordering
//! - Admin detail (missing or malformed id, malformed stored JSON)
//! - Logout, session expiry and admin-page access by regular users
//! - Health endpoint

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    async_trait,
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

use speakcheck_web::services::{AssessmentClientError, AssessmentProvider, QUESTION};
use speakcheck_web::session::{Session, SESSION_COOKIE};
use speakcheck_web::{build_router, db, AppState};

/// Canned assessment backend
struct StubAssessor {
    /// `None` answers every call with an upstream 503
    verdict: Option<Value>,
    calls: AtomicUsize,
    last_user_id: std::sync::Mutex<Option<String>>,
}

impl StubAssessor {
    fn returning(verdict: Value) -> Arc<Self> {
        Arc::new(Self {
            verdict: Some(verdict),
            calls: AtomicUsize::new(0),
            last_user_id: std::sync::Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            verdict: None,
            calls: AtomicUsize::new(0),
            last_user_id: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssessmentProvider for StubAssessor {
    async fn assess(
        &self,
        _audio_base64: &str,
        user_id: &str,
    ) -> Result<Value, AssessmentClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_id.lock().unwrap() = Some(user_id.to_string());
        match &self.verdict {
            Some(verdict) => Ok(verdict.clone()),
            None => Err(AssessmentClientError::Upstream {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

fn sample_verdict() -> Value {
    json!({
        "overall": {
            "overall_score": 83.0,
            "english_proficiency_scores": {
                "mock_ielts": { "prediction": 7.5 },
                "mock_cefr": { "prediction": "C1" },
                "mock_pte": { "prediction": "76-84" }
            }
        },
        "pronunciation": { "overall_score": 81.0 },
        "fluency": { "overall_score": 79.5 },
        "grammar": { "overall_score": 86.0 },
        "vocabulary": { "overall_score": 90.0 },
        "metadata": {
            "predicted_text": "I prepared the quarterly report.",
            "content_relevance": "RELEVANT",
            "content_relevance_feedback": "Answers the question directly."
        }
    })
}

/// Single-connection in-memory database with the production schema
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    speakcheck_common::db::create_schema(&pool)
        .await
        .expect("Should create schema");
    pool
}

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new(assessor: Arc<StubAssessor>) -> Self {
        Self::with_state(AppState::new(setup_test_db().await, assessor))
    }

    fn with_state(state: AppState) -> Self {
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST /login and return the session cookie pair (`name=value`)
    async fn login(&self, name: &str, nik: &str) -> String {
        let response = self.send(login_request(name, nik)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie_pair(&response).expect("login should set a session cookie")
    }

    async fn count(&self) -> i64 {
        db::count_assessments(&self.state.db).await.unwrap()
    }
}

fn login_request(name: &str, nik: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("name={}&nik={}", name, nik)))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn submit(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/submit_assessment")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn session_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn extract_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn extract_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

/// Insert a record directly with a fixed date
async fn seed(pool: &SqlitePool, name: &str, overall: f64, date: &str, raw: Option<&str>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO assessments (user_id, name, nik, question, overall_score, assessment_date, raw_response)
         VALUES ('seed', ?, '3201', ?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(QUESTION)
    .bind(overall)
    .bind(date)
    .bind(raw)
    .fetch_one(pool)
    .await
    .unwrap()
}

// =============================================================================
// Login gate
// =============================================================================

#[tokio::test]
async fn test_index_page_renders_login_form() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(get("/", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(extract_text(response).await.contains(r#"action="/login""#));
}

#[tokio::test]
async fn test_login_with_blank_field_rerenders_form() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(login_request("Budi", "+++")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie_pair(&response).is_none());
    assert!(extract_text(response).await.contains("Name and NIK are required"));
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_user_login_redirects_to_assessment() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(login_request("Budi", "3201")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/assessment");

    let cookie = session_cookie_pair(&response).unwrap();
    let page = app.send(get("/assessment", Some(&cookie))).await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = extract_text(page).await;
    assert!(html.contains("Budi"));
    assert!(html.contains("3201"));
}

#[tokio::test]
async fn test_repeated_login_gets_distinct_user_ids() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;

    let first = app.login("Budi", "3201").await;
    let second = app.login("Budi", "3201").await;
    assert_ne!(first, second);

    let mut user_ids = Vec::new();
    for cookie in [&first, &second] {
        let id = cookie.split_once('=').unwrap().1.parse().unwrap();
        match app.state.sessions.get(&id).await {
            Some(Session::User { user_id, .. }) => user_ids.push(user_id),
            other => panic!("expected user session, got {:?}", other),
        }
    }
    assert_ne!(user_ids[0], user_ids[1]);
}

#[tokio::test]
async fn test_admin_login_is_case_insensitive() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(login_request("admin", "ADMIN")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let cookie = session_cookie_pair(&response).unwrap();
    let id = cookie.split_once('=').unwrap().1.parse().unwrap();
    assert_eq!(app.state.sessions.get(&id).await, Some(Session::Admin));

    // Admin has no user identity: assessment page bounces to the dashboard
    let response = app.send(get("/assessment", Some(&cookie))).await;
    assert_eq!(location(&response), "/admin");

    // ...and submissions are unauthorized
    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_assessment_page_redirects_to_entry() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(get("/assessment", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(get("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(app.state.sessions.is_empty().await);

    let response = app.send(get("/assessment", Some(&cookie))).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_idle_session_expires() {
    let state = AppState::new(setup_test_db().await, StubAssessor::returning(sample_verdict()))
        .with_session_ttl(Duration::from_millis(1));
    let app = TestApp::with_state(state);
    let cookie = app.login("Budi", "3201").await;

    tokio::time::sleep(Duration::from_millis(20)).await;

    let response = app.send(get("/assessment", Some(&cookie))).await;
    assert_eq!(location(&response), "/");

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_abandoned_sessions_are_swept() {
    let state = AppState::new(setup_test_db().await, StubAssessor::returning(sample_verdict()))
        .with_session_ttl(Duration::from_millis(1));
    let app = TestApp::with_state(state);

    for i in 0..50 {
        app.login(&format!("User{}", i), "3201").await;
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    app.login("Late", "3201").await;

    assert_eq!(app.state.sessions.len().await, 1);
}

// =============================================================================
// Assessment submission
// =============================================================================

#[tokio::test]
async fn test_submit_without_session_is_unauthorized() {
    let assessor = StubAssessor::returning(sample_verdict());
    let app = TestApp::new(assessor.clone()).await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(extract_json(response).await["error"], "Session expired");
    assert_eq!(assessor.calls(), 0);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_submit_without_audio_key_is_bad_request() {
    let assessor = StubAssessor::returning(sample_verdict());
    let app = TestApp::new(assessor.clone()).await;
    let cookie = app.login("Budi", "3201").await;

    for body in [r#"{}"#, r#"{"audio_base64":""}"#, r#"{"audio_base64":null}"#] {
        let response = app.send(submit(body, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert!(extract_json(response).await["error"].is_string());
    }

    assert_eq!(assessor.calls(), 0);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_submit_malformed_json_is_bad_request() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(submit("{not json", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_submit_upstream_failure_stores_nothing() {
    let assessor = StubAssessor::failing();
    let app = TestApp::new(assessor.clone()).await;
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("503"));
    assert!(error.contains("service unavailable"));
    assert_eq!(assessor.calls(), 1);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_submit_success_persists_exactly_one_record() {
    let assessor = StubAssessor::returning(sample_verdict());
    let app = TestApp::new(assessor.clone()).await;
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(submit(r#"{"audio_base64":"GkXfo0AgQoaBAUL3gQ=="}"#, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["success"], true);
    let results = &body["results"];
    assert_eq!(results["overall_score"], 83.0);
    assert_eq!(results["pronunciation_score"], 81.0);
    assert_eq!(results["fluency_score"], 79.5);
    assert_eq!(results["grammar_score"], 86.0);
    assert_eq!(results["vocabulary_score"], 90.0);
    assert_eq!(results["ielts_prediction"], 7.5);
    assert_eq!(results["cefr_prediction"], "C1");
    assert_eq!(results["pte_prediction"], "76-84");
    assert_eq!(results["predicted_text"], "I prepared the quarterly report.");
    assert_eq!(results["content_relevance"], "RELEVANT");
    assert_eq!(results["content_relevance_feedback"], "Answers the question directly.");
    assert!(results.get("raw_response").is_none());

    assert_eq!(app.count().await, 1);

    let records = db::list_assessments(&app.state.db, &Default::default()).await.unwrap();
    let record = &records[0];
    assert_eq!(record.name, "Budi");
    assert_eq!(record.nik, "3201");
    assert_eq!(record.question, QUESTION);
    assert_eq!(record.overall_score, 83.0);
    assert_eq!(record.cefr_prediction, "C1");
    assert_eq!(
        assessor.last_user_id.lock().unwrap().as_deref(),
        Some(record.user_id.as_str())
    );
    assert_eq!(record.parsed_raw_response(), sample_verdict());
}

#[tokio::test]
async fn test_submit_with_sparse_verdict_defaults_fields() {
    let app = TestApp::new(StubAssessor::returning(json!({
        "overall": { "overall_score": 55.0 }
    })))
    .await;
    let cookie = app.login("Siti", "3301").await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let results = extract_json(response).await["results"].clone();
    assert_eq!(results["overall_score"], 55.0);
    assert_eq!(results["fluency_score"], 0.0);
    assert_eq!(results["ielts_prediction"], 0.0);
    assert_eq!(results["cefr_prediction"], "");
    assert_eq!(results["predicted_text"], "");
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_submit_with_non_finite_score_text_stores_zero() {
    let app = TestApp::new(StubAssessor::returning(json!({
        "overall": { "overall_score": "NaN" },
        "fluency": { "overall_score": "inf" }
    })))
    .await;
    let cookie = app.login("Siti", "3301").await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let results = extract_json(response).await["results"].clone();
    assert_eq!(results["overall_score"], 0.0);
    assert_eq!(results["fluency_score"], 0.0);
    assert_eq!(app.count().await, 1);
}

#[tokio::test]
async fn test_submit_insert_failure_stores_nothing() {
    let assessor = StubAssessor::returning(sample_verdict());
    let app = TestApp::new(assessor.clone()).await;
    sqlx::query(
        "CREATE TRIGGER reject_insert AFTER INSERT ON assessments
         BEGIN SELECT RAISE(ABORT, 'disk quota exceeded'); END",
    )
    .execute(&app.state.db)
    .await
    .unwrap();
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("disk quota exceeded"));
    assert_eq!(assessor.calls(), 1);
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn test_submit_read_back_failure_rolls_back_row() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    // Row is written, then the read-back cannot parse its date
    sqlx::query(
        "CREATE TRIGGER corrupt_date AFTER INSERT ON assessments
         BEGIN UPDATE assessments SET assessment_date = 'not-a-date' WHERE id = NEW.id; END",
    )
    .execute(&app.state.db)
    .await
    .unwrap();
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(submit(r#"{"audio_base64":"AAAA"}"#, Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(extract_json(response).await["error"].is_string());
    assert_eq!(app.count().await, 0);
}

// =============================================================================
// Admin dashboard
// =============================================================================

#[tokio::test]
async fn test_admin_requires_admin_session() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;

    let response = app.send(get("/admin", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.send(get("/admin/detail/1", None)).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_user_on_admin_page_loses_session() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let cookie = app.login("Budi", "3201").await;

    let response = app.send(get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_admin_min_score_filter_and_order() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let pool = &app.state.db;
    seed(pool, "Low Scorer", 42.0, "2024-05-03T10:00:00.000Z", None).await;
    seed(pool, "Older High", 91.0, "2024-05-01T10:00:00.000Z", None).await;
    seed(pool, "Newest High", 80.0, "2024-05-04T10:00:00.000Z", None).await;
    seed(pool, "Middle High", 88.5, "2024-05-02T10:00:00.000Z", None).await;

    let cookie = app.login("admin", "admin").await;
    let response = app.send(get("/admin?min_score=80", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = extract_text(response).await;
    assert!(!html.contains("Low Scorer"));
    let newest = html.find("Newest High").unwrap();
    let middle = html.find("Middle High").unwrap();
    let older = html.find("Older High").unwrap();
    assert!(newest < middle && middle < older);
    assert!(html.contains("3 result(s)"));
}

#[tokio::test]
async fn test_admin_ignores_non_numeric_score_filter() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    seed(&app.state.db, "Anyone", 10.0, "2024-05-03T10:00:00.000Z", None).await;

    let cookie = app.login("admin", "admin").await;
    let response = app
        .send(get("/admin?min_score=abc&max_score=&start_date=soon", Some(&cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response).await;
    assert!(html.contains("Anyone"));
    // Entered value is echoed back into the form
    assert!(html.contains(r#"value="abc""#));
}

#[tokio::test]
async fn test_admin_name_filter_folds_non_ascii_case() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    seed(&app.state.db, "ÉLISE DURAND", 72.0, "2024-05-03T10:00:00.000Z", None).await;
    seed(&app.state.db, "Elisabeth", 68.0, "2024-05-04T10:00:00.000Z", None).await;

    let cookie = app.login("admin", "admin").await;
    // name_filter=élise
    let response = app.send(get("/admin?name_filter=%C3%A9lise", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response).await;
    assert!(html.contains("ÉLISE DURAND"));
    assert!(!html.contains("Elisabeth"));
}

#[tokio::test]
async fn test_admin_name_and_date_filters() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let pool = &app.state.db;
    seed(pool, "Budi Santoso", 70.0, "2024-06-01T08:00:00.000Z", None).await;
    seed(pool, "BUDIMAN", 75.0, "2024-06-15T23:59:00.000Z", None).await;
    seed(pool, "Budi Late", 75.0, "2024-06-16T00:01:00.000Z", None).await;
    seed(pool, "Siti", 75.0, "2024-06-10T08:00:00.000Z", None).await;

    let cookie = app.login("admin", "admin").await;
    let response = app
        .send(get(
            "/admin?name_filter=budi&start_date=2024-06-01&end_date=2024-06-15",
            Some(&cookie),
        ))
        .await;

    let html = extract_text(response).await;
    assert!(html.contains("Budi Santoso"));
    assert!(html.contains("BUDIMAN"));
    assert!(!html.contains("Budi Late"));
    assert!(!html.contains("Siti"));
}

// =============================================================================
// Admin detail
// =============================================================================

#[tokio::test]
async fn test_admin_detail_missing_id_redirects_to_list() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let cookie = app.login("admin", "admin").await;

    let response = app.send(get("/admin/detail/999", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_admin_detail_malformed_id() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;

    let response = app.send(get("/admin/detail/abc", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let cookie = app.login("admin", "admin").await;
    let response = app.send(get("/admin/detail/abc", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_admin_detail_shows_raw_response() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let raw = r#"{"overall":{"overall_score":64},"marker":"raw-visible"}"#;
    let id = seed(&app.state.db, "Detail Person", 64.0, "2024-05-03T10:00:00.000Z", Some(raw)).await;

    let cookie = app.login("admin", "admin").await;
    let response = app.send(get(&format!("/admin/detail/{}", id), Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response).await;
    assert!(html.contains("Detail Person"));
    assert!(html.contains("raw-visible"));
}

#[tokio::test]
async fn test_admin_detail_with_malformed_raw_response() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let id = seed(&app.state.db, "Broken Raw", 50.0, "2024-05-03T10:00:00.000Z", Some("{oops")).await;

    let cookie = app.login("admin", "admin").await;
    let response = app.send(get(&format!("/admin/detail/{}", id), Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response).await;
    assert!(html.contains("Broken Raw"));
    assert!(html.contains("<pre>{}</pre>"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_session_required() {
    let app = TestApp::new(StubAssessor::returning(sample_verdict())).await;
    let response = app.send(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "speakcheck-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}
