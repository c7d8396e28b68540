//! Entry page, login and logout

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::session::{self, expired_session_cookie, session_cookie, SessionContext};
use crate::ui;
use crate::AppState;

/// Login form fields; absent fields read as empty and fail validation
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nik: String,
}

/// GET /
pub async fn index_page() -> Html<String> {
    Html(ui::login_page(None))
}

/// POST /login
///
/// Replaces any session the browser already had.
pub async fn login(
    State(state): State<AppState>,
    ctx: SessionContext,
    Form(form): Form<LoginForm>,
) -> Response {
    let session = match session::login(&form.name, &form.nik) {
        Ok(session) => session,
        Err(e) => {
            warn!("Rejected login: {}", e);
            return Html(ui::login_page(Some(&e.to_string()))).into_response();
        }
    };

    if let Some(old_id) = ctx.id {
        state.sessions.remove(&old_id).await;
    }

    let target = if session.is_admin() {
        info!("Administrator logged in");
        "/admin"
    } else {
        info!("User logged in");
        "/assessment"
    };

    let id = state.sessions.insert(session).await;
    (
        [(header::SET_COOKIE, session_cookie(id))],
        Redirect::to(target),
    )
        .into_response()
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, ctx: SessionContext) -> Response {
    if let Some(id) = ctx.id {
        state.sessions.remove(&id).await;
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
