//! Axum route handlers for the Sessions API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::conversation::fallback::welcome_message;
use crate::errors::AppError;
use crate::job::keywords::{JobTarget, KeywordEntry};
use crate::profile::models::ProfileRecord;
use crate::session::context::{SessionContext, SessionSnapshot, SessionStatus};
use crate::session::turn::Turn;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub profile_url: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub welcome: String,
    pub profile: ProfileRecord,
    pub job_keywords: Vec<KeywordEntry>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub job_title: String,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RestoreSessionResponse {
    pub session_id: Uuid,
    pub restored_from: Uuid,
    pub turns: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Acquires the profile once and opens a session. Any acquisition failure
/// is returned as-is and no session is created.
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), AppError> {
    if request.profile_url.trim().is_empty() {
        return Err(AppError::Validation("profile_url cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let profile = state
        .profile_source
        .acquire_profile(&request.profile_url)
        .await?;
    let job = JobTarget::new(request.job_description);

    let session = state.sessions.insert(SessionContext::new(profile, job));
    info!(
        "Session {} started for '{}' ({} job keywords)",
        session.id(),
        session.job().title(),
        session.job().keywords.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session.id(),
            welcome: welcome_message(&session.profile().name, session.job().title()),
            profile: session.profile().clone(),
            job_keywords: session.job().keywords.clone(),
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    Ok(Json(SessionDetailResponse {
        session_id,
        created_at: session.created_at(),
        status: session.status(),
        job_title: session.job().title().to_string(),
        transcript: session.transcript(),
    }))
}

/// POST /api/v1/sessions/:id/messages
///
/// Runs one turn. 409 while another turn is in flight; 204 when the result
/// was discarded because it no longer belonged to the in-flight turn.
pub async fn handle_submit_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    match state
        .coordinator
        .handle_message(&session, &request.message)
        .await?
    {
        Some(reply) => Ok(Json(reply).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    info!("Session {session_id} discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/snapshot
pub async fn handle_get_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/restore
///
/// Opens a new live session from a snapshot. The profile is taken from the
/// snapshot; the profile source is not called again.
pub async fn handle_restore_session(
    State(state): State<AppState>,
    Json(snapshot): Json<SessionSnapshot>,
) -> Result<(StatusCode, Json<RestoreSessionResponse>), AppError> {
    let restored_from = snapshot.session_id;
    let context = SessionContext::from_snapshot(snapshot)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let turns = context.transcript().len();
    let session = state.sessions.insert(context);
    info!(
        "Session {} restored from {restored_from} with {turns} turns",
        session.id()
    );

    Ok((
        StatusCode::CREATED,
        Json(RestoreSessionResponse {
            session_id: session.id(),
            restored_from,
            turns,
        }),
    ))
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {session_id} not found"))
}
