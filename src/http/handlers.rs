use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchError;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::session::{NewSession, Session, StoreError};

fn default_send() -> bool {
    true
}

/// Body of `POST /sessions`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateSessionRequest {
    #[serde(flatten)]
    pub session: NewSession,
    /// Dispatch immediately after creating (default: true).
    #[serde(default = "default_send")]
    pub send: bool,
}

/// Override URL, from `?url=` or a resend body of `{"url": ...}`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OverrideQuery {
    pub url: Option<String>,
}

/// A session as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub display: String,
    pub path: String,
    pub needs_to_send_request: bool,
    /// Set when creation succeeded but the immediate send did not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_error: Option<String>,
}

impl SessionView {
    pub fn new(session: Session) -> Self {
        Self {
            display: session.to_display_string(),
            path: session.canonical_path(),
            needs_to_send_request: session.needs_to_send_request(),
            dispatch_error: None,
            session,
        }
    }

    fn with_error(mut self, error: &DispatchError) -> Self {
        self.dispatch_error = Some(error.to_string());
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub sessions: usize,
    pub pending: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let sessions = state.dispatcher.store().list();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        pending: sessions.iter().filter(|s| s.needs_to_send_request()).count(),
        sessions: sessions.len(),
    })
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let session = state.dispatcher.store().create(request.session)?;
    if !request.send {
        return Ok((StatusCode::CREATED, Json(SessionView::new(session))));
    }

    let view = match state.dispatcher.send(session.id, None).await {
        Ok(done) => SessionView::new(done),
        Err(e) => {
            tracing::warn!(
                session_id = session.id,
                error = %e,
                "Created session could not be sent"
            );
            SessionView::new(session).with_error(&e)
        }
    };
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionView>> {
    Json(state.dispatcher.store().list().into_iter().map(SessionView::new).collect())
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.dispatcher.store().get(id).ok_or(StoreError::NotFound(id))?;
    Ok(Json(SessionView::new(session)))
}

/// A `url` in the JSON body wins over `?url=`.
pub async fn resend_session(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<OverrideQuery>,
    body: Option<Json<OverrideQuery>>,
) -> Result<Json<SessionView>, ApiError> {
    let override_url = body.and_then(|Json(body)| body.url).or(query.url);
    let session = state.dispatcher.send(id, override_url.as_deref()).await?;
    Ok(Json(SessionView::new(session)))
}

/// Raw request text, exactly as it would be written to the socket.
pub async fn get_raw_request(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<OverrideQuery>,
) -> Result<String, ApiError> {
    let session = state.dispatcher.store().get(id).ok_or(StoreError::NotFound(id))?;
    Ok(session.get_raw_request(query.url.as_deref())?)
}
