//! Login gate and server-side sessions
//!
//! A browser holds only an opaque session id in the `speakcheck_session`
//! cookie. Identity lives in [`SessionStore`], which is owned by
//! [`AppState`](crate::AppState) and handed to each request through the
//! [`SessionContext`] extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use speakcheck_common::config::DEFAULT_SESSION_TTL_SECS;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "speakcheck_session";

/// Sentinel credential granting the administrator role
const ADMIN_SENTINEL: &str = "admin";

/// Authenticated identity attached to a browser
///
/// Anonymous browsers have no `Session` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Regular test taker
    User {
        name: String,
        nik: String,
        /// Fresh per login, sent upstream as `x-user-id`
        user_id: Uuid,
    },
    /// Administrator; carries no persisted identity
    Admin,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Name and NIK are required")]
    MissingFields,
}

/// Validate login fields and build a session
///
/// Both fields are trimmed. `admin`/`admin` (any case) yields an
/// administrator session; anything else yields a user session with a newly
/// generated `user_id`, even when the same name and NIK log in again.
pub fn login(name: &str, nik: &str) -> Result<Session, LoginError> {
    let name = name.trim();
    let nik = nik.trim();

    if name.is_empty() || nik.is_empty() {
        return Err(LoginError::MissingFields);
    }

    if name.eq_ignore_ascii_case(ADMIN_SENTINEL) && nik.eq_ignore_ascii_case(ADMIN_SENTINEL) {
        return Ok(Session::Admin);
    }

    Ok(Session::User {
        name: name.to_string(),
        nik: nik.to_string(),
        user_id: Uuid::new_v4(),
    })
}

/// In-memory session table keyed by cookie id
///
/// Sessions expire after `ttl` without a request. Expired entries read as
/// absent and are swept whenever a new session is stored.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
}

struct StoredSession {
    session: Session,
    last_seen: Instant,
}

impl StoredSession {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a session and return its new id
    pub async fn insert(&self, session: Session) -> Uuid {
        self.insert_at(session, Instant::now()).await
    }

    /// Live session for `id`; refreshes its idle timer
    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.get_at(id, Instant::now()).await
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.write().await.remove(id).map(|s| s.session)
    }

    /// Stored entries, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn insert_at(&self, session: Session, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let ttl = self.ttl;
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_expired(now, ttl));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!("Swept {} expired session(s)", swept);
        }

        sessions.insert(
            id,
            StoredSession {
                session,
                last_seen: now,
            },
        );
        id
    }

    async fn get_at(&self, id: &Uuid, now: Instant) -> Option<Session> {
        let mut sessions = self.sessions.write().await;

        if sessions.get(id)?.is_expired(now, self.ttl) {
            sessions.remove(id);
            return None;
        }

        let stored = sessions.get_mut(id)?;
        stored.last_seen = now;
        Some(stored.session.clone())
    }
}

/// Session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the browser to `id`
pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// `Set-Cookie` value that deletes the session cookie
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Per-request view of the caller's session
///
/// Never rejects: a missing, malformed or stale cookie yields an anonymous
/// context so each handler decides between redirect and 401.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Cookie id, present even when the store no longer knows it
    pub id: Option<Uuid>,
    pub session: Option<Session>,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Name, NIK and user id of a logged-in non-admin user
    pub fn user(&self) -> Option<(&str, &str, Uuid)> {
        match &self.session {
            Some(Session::User { name, nik, user_id }) => Some((name.as_str(), nik.as_str(), *user_id)),
            _ => None,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_id_from_headers(&parts.headers);
        let session = match &id {
            Some(id) => state.sessions.get(id).await,
            None => None,
        };
        Ok(SessionContext { id, session })
    }
}
