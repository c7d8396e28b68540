//! Recording page and assessment submission

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{NewAssessment, SimplifiedResult};
use crate::services::QUESTION;
use crate::session::SessionContext;
use crate::ui;
use crate::AppState;

/// Body of `POST /submit_assessment`
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// Success body of `POST /submit_assessment`
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub results: SimplifiedResult,
}

/// GET /assessment
pub async fn assessment_page(ctx: SessionContext) -> Response {
    if ctx.is_admin() {
        return Redirect::to("/admin").into_response();
    }

    match ctx.user() {
        Some((name, nik, _)) => Html(ui::assessment_page(name, nik)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// POST /submit_assessment
///
/// Session is checked before the body so an expired session is always a 401.
/// Exactly one row is stored per successful call; upstream failures store nothing.
pub async fn submit_assessment(
    State(state): State<AppState>,
    ctx: SessionContext,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let (name, nik, user_id) = ctx
        .user()
        .ok_or_else(|| ApiError::Unauthorized("Session expired".to_string()))?;

    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;

    let audio_base64 = request
        .audio_base64
        .as_deref()
        .map(str::trim)
        .filter(|audio| !audio.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No audio data provided".to_string()))?;

    let verdict = state
        .assessor
        .assess(audio_base64, &user_id.to_string())
        .await
        .map_err(|e| {
            warn!(user_id = %user_id, "Assessment call failed: {}", e);
            ApiError::from(e)
        })?;

    let new = NewAssessment::from_verdict(&verdict, user_id, name, nik, QUESTION)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize verdict: {}", e)))?;

    let record = db::insert_assessment(&state.db, &new).await?;

    info!(
        assessment_id = record.id,
        overall_score = record.overall_score,
        "Assessment stored"
    );

    Ok(Json(SubmitResponse {
        success: true,
        results: SimplifiedResult::from(&record),
    }))
}
