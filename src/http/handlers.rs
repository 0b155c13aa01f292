use super::state::AppState;
use crate::analytics::{insights_from_store, latest_session, session_history};
use crate::error::{AuthError, SessionError};
use crate::profile::PreferencesPatch;
use crate::session::{EndOutcome, SessionMode};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitTurnRequest {
    /// Text to send; when absent the composed transcript is submitted
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub mode: Option<SessionMode>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn session_error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::CapabilityUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::GenerationContract(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Finalization(_) => StatusCode::BAD_GATEWAY,
        SessionError::Auth(_) => StatusCode::UNAUTHORIZED,
        SessionError::TurnInFlight
        | SessionError::SessionClosed(_)
        | SessionError::SessionInProgress
        | SessionError::NoActiveSession => StatusCode::CONFLICT,
        SessionError::EmptyUtterance => StatusCode::BAD_REQUEST,
    };

    if status.is_server_error() {
        error!("Session request failed: {}", err);
    } else {
        info!("Session request rejected: {}", err);
    }

    error_response(status, err)
}

fn status_ok(status: &str) -> Response {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: status.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.engine.snapshot().await))
}

/// POST /session/input
/// Replace the text being composed
pub async fn set_input(
    State(state): State<AppState>,
    Json(req): Json<InputRequest>,
) -> Response {
    match state.engine.set_input(req.text).await {
        Ok(()) => (StatusCode::OK, Json(state.engine.transcript().await)).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/turns
/// Submit a user turn and wait for the reply
pub async fn submit_turn(
    State(state): State<AppState>,
    Json(req): Json<SubmitTurnRequest>,
) -> Response {
    let result = match req.text {
        Some(text) => state.engine.send(text).await,
        None => state.engine.submit().await,
    };

    match result {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/listen/start
pub async fn start_listening(State(state): State<AppState>) -> Response {
    match state.engine.start_listening().await {
        Ok(()) => status_ok("listening"),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/listen/stop
pub async fn stop_listening(State(state): State<AppState>) -> Response {
    match state.engine.stop_listening().await {
        Ok(()) => status_ok("idle"),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/end
/// Summarize and persist the live session
pub async fn end_session(State(state): State<AppState>) -> Response {
    match state.engine.end_session().await {
        Ok(EndOutcome::AlreadyFinalizing) => {
            (StatusCode::ACCEPTED, Json(EndOutcome::AlreadyFinalizing)).into_response()
        }
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/new
pub async fn new_session(
    State(state): State<AppState>,
    body: Option<Json<NewSessionRequest>>,
) -> Response {
    let mode = body.and_then(|Json(req)| req.mode);

    match state.engine.start_new_session(mode).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// GET /history?limit=N
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match session_history(state.store.as_ref(), query.limit).await {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(e) => {
            error!("Failed to load history: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// GET /history/latest
/// Report for the most recent session
pub async fn get_latest_session(State(state): State<AppState>) -> Response {
    match latest_session(state.store.as_ref()).await {
        Ok(Some(session)) => (StatusCode::OK, Json(session)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "No sessions yet"),
        Err(e) => {
            error!("Failed to load latest session: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// GET /insights
pub async fn get_insights(State(state): State<AppState>) -> Response {
    match insights_from_store(state.store.as_ref(), &Local::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to compute insights: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// GET /profile
pub async fn get_profile(State(state): State<AppState>) -> Response {
    match state.profiles.current_user().await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

/// POST /profile/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(patch): Json<PreferencesPatch>,
) -> Response {
    match state.profiles.update_preferences(patch).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => auth_error_response(e),
    }
}

fn auth_error_response(err: AuthError) -> Response {
    let status = match err {
        AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        AuthError::Rejected(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, err)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
