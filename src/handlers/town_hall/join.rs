use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    AppState,
    handlers::ApiError,
    services::{
        livekit::{ParticipantRole, TokenRequest, generate_room_token},
        membership::{MembershipType, parse_hat_id},
        town_hall::{SessionStatus, TownHallSession},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    pub user_address: Address,
    #[serde(default)]
    pub role: ParticipantRole,
    pub governance_token_address: Option<Address>,
    pub hat_id: Option<HatIdParam>,
}

/// Hat id as a JSON number or a decimal / 0x-prefixed hex string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HatIdParam {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for HatIdParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HatIdParam::Number(n) => write!(f, "{}", n),
            HatIdParam::Text(text) => write!(f, "{}", text),
        }
    }
}

impl HatIdParam {
    fn parse(&self) -> Option<U256> {
        match self {
            HatIdParam::Number(n) => Some(U256::from(*n)),
            HatIdParam::Text(text) => parse_hat_id(text),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionResponse {
    pub session: TownHallSession,
    pub token: String,
    pub room_name: String,
    pub membership_type: Option<MembershipType>,
}

/// Join a session: verify DAO membership and return a room token
///
/// POST /api/town-hall/sessions/{id}/join
pub async fn join_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    payload: Result<Json<JoinSessionRequest>, JsonRejection>,
) -> Result<Json<JoinSessionResponse>, ApiError> {
    let Json(payload) = payload?;
    let session = state.sessions.get(&session_id).await?;

    if session.status == SessionStatus::Ended {
        return Err(ApiError::Conflict("Session has ended".to_string()));
    }

    let hat = payload
        .hat_id
        .as_ref()
        .map(|hat_id| {
            hat_id
                .parse()
                .map(|hat_id| state.hat_role(hat_id))
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid hatId: {}", hat_id)))
        })
        .transpose()?;

    // Only the scheduled presenter may publish
    let role = if payload.role == ParticipantRole::Presenter && payload.user_address != session.presenter {
        log::info!(
            "{:?} requested presenter role on session {} but is not the presenter",
            payload.user_address,
            session.id
        );
        ParticipantRole::Participant
    } else {
        payload.role
    };

    let request = TokenRequest {
        user_address: payload.user_address,
        safe_address: session.dao_address,
        session_id: session.id.clone(),
        role,
        governance_token_address: payload.governance_token_address,
        hat,
    };

    let response =
        generate_room_token(state.chain.as_ref(), &state.env_vars.livekit_config(), &request)
            .await?;

    // The session may have ended while membership was being checked
    let session = state.sessions.get(&session_id).await?;
    if session.status == SessionStatus::Ended {
        log::info!("Session {} ended before {:?} could join", session.id, payload.user_address);
        return Err(ApiError::Conflict("Session has ended".to_string()));
    }

    Ok(Json(JoinSessionResponse {
        session,
        token: response.token,
        room_name: response.room_name,
        membership_type: response.membership_type,
    }))
}
