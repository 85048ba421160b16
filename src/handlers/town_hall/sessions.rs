use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    AppState,
    handlers::{ApiError, parse_address},
    services::town_hall::{NewSession, TownHallSession},
};

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub dao: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<TownHallSession>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: TownHallSession,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub dao_address: Address,
    pub creator: Address,
    pub presenter: Address,
    pub start_time: i64,
}

/// List all sessions for a DAO
///
/// GET /api/town-hall/sessions?dao=0x...
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListSessionsQuery>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let dao = params
        .dao
        .filter(|dao| !dao.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing dao query parameter".to_string()))?;
    let dao_address = parse_address("dao", &dao)?;

    let sessions = state.sessions.list_for_dao(dao_address).await;

    Ok(Json(SessionsResponse { sessions }))
}

/// Create a new Town Hall session in `scheduled` state
///
/// POST /api/town-hall/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(payload) = payload?;
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let session = state
        .sessions
        .create(NewSession {
            title: payload.title,
            description: payload.description,
            dao_address: payload.dao_address,
            creator: payload.creator,
            presenter: payload.presenter,
            start_time: payload.start_time,
        })
        .await;

    Ok((StatusCode::CREATED, Json(SessionResponse { session })))
}

/// Mark a session live
///
/// POST /api/town-hall/sessions/{id}/start
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.start(&session_id).await?;
    log::info!("Town Hall session {} is live", session.id);
    Ok(Json(SessionResponse { session }))
}

/// End a session
///
/// POST /api/town-hall/sessions/{id}/end
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let session = state.sessions.end(&session_id, now_ms).await?;
    log::info!("Town Hall session {} ended", session.id);
    Ok(Json(SessionResponse { session }))
}
