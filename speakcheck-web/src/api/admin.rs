//! Admin dashboard and detail view
//!
//! Only administrator sessions get through. A regular user session that
//! reaches these pages is cleared before redirecting to the entry page.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::warn;

use crate::db;
use crate::error::ApiResult;
use crate::models::{AdminQuery, AssessmentFilter};
use crate::session::{expired_session_cookie, SessionContext};
use crate::ui;
use crate::AppState;

/// GET /admin
pub async fn admin_dashboard(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<AdminQuery>,
) -> ApiResult<Response> {
    if let Some(redirect) = reject_non_admin(&state, &ctx).await {
        return Ok(redirect);
    }

    let filter = AssessmentFilter::from_query(&query);
    let records = db::list_assessments(&state.db, &filter).await?;

    Ok(Html(ui::admin_page(&records, &query)).into_response())
}

/// GET /admin/detail/:id
///
/// Malformed and unknown ids go back to the list. The id is parsed only after
/// the admin check so non-admins are always redirected.
pub async fn admin_detail(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    if let Some(redirect) = reject_non_admin(&state, &ctx).await {
        return Ok(redirect);
    }

    let Ok(id) = raw_id.parse::<i64>() else {
        warn!("Malformed assessment id: {}", raw_id);
        return Ok(Redirect::to("/admin").into_response());
    };

    let Some(record) = db::get_assessment(&state.db, id).await? else {
        return Ok(Redirect::to("/admin").into_response());
    };

    let raw_response = record.parsed_raw_response();
    Ok(Html(ui::detail_page(&record, &raw_response)).into_response())
}

/// Redirect for anyone but an administrator
async fn reject_non_admin(state: &AppState, ctx: &SessionContext) -> Option<Response> {
    if ctx.is_admin() {
        return None;
    }

    match (ctx.id, &ctx.session) {
        (Some(id), Some(_)) => {
            warn!("Non-admin session on admin page; clearing session");
            state.sessions.remove(&id).await;
            Some(
                (
                    [(header::SET_COOKIE, expired_session_cookie())],
                    Redirect::to("/"),
                )
                    .into_response(),
            )
        }
        _ => Some(Redirect::to("/").into_response()),
    }
}
