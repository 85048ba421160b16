//! Town Hall room access tokens
//!
//! Tokens follow the LiveKit access token format: an HS256 JWT signed with
//! the API secret, issuer = API key, subject = participant identity, and a
//! `video` grant scoped to a single room. Membership is verified on-chain
//! before a token is issued.

use ethers::types::Address;
use ethers::utils::to_checksum;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::chain::ChainReader;
use crate::services::membership::{HatRole, MembershipType, check_dao_membership};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Access denied: not a DAO member")]
    AccessDenied,

    #[error("Failed to sign room token: {0}")]
    Signing(String),
}

#[derive(Clone, Debug, Default)]
pub struct LiveKitConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub token_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Presenter,
    #[default]
    Participant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room_join: bool,
    pub room: String,
    pub can_publish: bool,
    pub can_publish_data: bool,
    pub can_subscribe: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomClaims {
    /// API key
    pub iss: String,
    /// Participant identity (wallet address)
    pub sub: String,
    pub nbf: usize,
    pub exp: usize,
    pub video: VideoGrant,
}

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub user_address: Address,
    pub safe_address: Address,
    pub session_id: String,
    pub role: ParticipantRole,
    pub governance_token_address: Option<Address>,
    pub hat: Option<HatRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub room_name: String,
    pub membership_type: Option<MembershipType>,
}

pub fn room_name(safe_address: Address, session_id: &str) -> String {
    format!("townhall-{}-{}", to_checksum(&safe_address, None), session_id)
}

/// Sign a room token. Returns an empty token when LiveKit is not configured
/// so the frontend can still resolve the room name.
pub fn sign_room_token(
    config: &LiveKitConfig,
    identity: Address,
    room: &str,
    role: ParticipantRole,
) -> Result<String, TokenError> {
    let (Some(api_key), Some(api_secret)) = (&config.api_key, &config.api_secret) else {
        log::warn!("LiveKit credentials not configured, issuing placeholder token for {}", room);
        return Ok(String::new());
    };

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = RoomClaims {
        iss: api_key.clone(),
        sub: to_checksum(&identity, None),
        nbf: now,
        exp: now + config.token_ttl_secs as usize,
        video: VideoGrant {
            room_join: true,
            room: room.to_string(),
            can_publish: role == ParticipantRole::Presenter,
            can_publish_data: true,
            can_subscribe: true,
        },
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Generate a room token after verifying DAO membership
pub async fn generate_room_token(
    reader: &dyn ChainReader,
    config: &LiveKitConfig,
    request: &TokenRequest,
) -> Result<TokenResponse, TokenError> {
    let access = check_dao_membership(
        reader,
        request.safe_address,
        request.user_address,
        request.governance_token_address,
        request.hat,
    )
    .await;

    if !access.has_access {
        log::info!(
            "Denied Town Hall access for {:?} on Safe {:?}",
            request.user_address,
            request.safe_address
        );
        return Err(TokenError::AccessDenied);
    }

    let room_name = room_name(request.safe_address, &request.session_id);
    let token = sign_room_token(config, request.user_address, &room_name, request.role)?;

    Ok(TokenResponse {
        token,
        room_name,
        membership_type: access.membership_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{MockChain, address, encode_addresses};
    use jsonwebtoken::{DecodingKey, Validation, decode};

    fn config() -> LiveKitConfig {
        LiveKitConfig {
            api_key: Some("APIkey".to_string()),
            api_secret: Some("livekit-test-secret".to_string()),
            token_ttl_secs: 3600,
        }
    }

    fn request(role: ParticipantRole) -> TokenRequest {
        TokenRequest {
            user_address: address(10),
            safe_address: address(0),
            session_id: "session-1".to_string(),
            role,
            governance_token_address: None,
            hat: None,
        }
    }

    fn decode_claims(token: &str) -> RoomClaims {
        let key = DecodingKey::from_secret(b"livekit-test-secret");
        decode::<RoomClaims>(token, &key, &Validation::new(Algorithm::HS256))
            .expect("Failed to verify room token")
            .claims
    }

    #[tokio::test]
    async fn test_member_gets_signed_token() {
        let chain =
            MockChain::new().with_read(address(0), "getOwners", encode_addresses(&[address(10)]));

        let response = generate_room_token(&chain, &config(), &request(ParticipantRole::Presenter))
            .await
            .unwrap();

        assert_eq!(response.room_name, room_name(address(0), "session-1"));
        assert_eq!(response.membership_type, Some(MembershipType::Signer));

        let claims = decode_claims(&response.token);
        assert_eq!(claims.iss, "APIkey");
        assert_eq!(claims.sub, to_checksum(&address(10), None));
        assert_eq!(claims.exp - claims.nbf, 3600);
        assert!(claims.video.room_join);
        assert!(claims.video.can_publish);
        assert_eq!(claims.video.room, response.room_name);
    }

    #[tokio::test]
    async fn test_participant_cannot_publish() {
        let chain =
            MockChain::new().with_read(address(0), "getOwners", encode_addresses(&[address(10)]));

        let response = generate_room_token(&chain, &config(), &request(ParticipantRole::Participant))
            .await
            .unwrap();

        let claims = decode_claims(&response.token);
        assert!(!claims.video.can_publish);
        assert!(claims.video.can_publish_data);
    }

    #[tokio::test]
    async fn test_non_member_is_denied() {
        let chain = MockChain::new().with_read(address(0), "getOwners", encode_addresses(&[]));

        let result = generate_room_token(&chain, &config(), &request(ParticipantRole::Participant)).await;
        assert!(matches!(result, Err(TokenError::AccessDenied)));
    }

    #[test]
    fn test_placeholder_token_without_credentials() {
        let token = sign_room_token(
            &LiveKitConfig::default(),
            address(10),
            "townhall-x-y",
            ParticipantRole::Participant,
        )
        .unwrap();
        assert!(token.is_empty());
    }

    #[test]
    fn test_room_name_format() {
        let name = room_name(address(0), "abc");
        assert!(name.starts_with("townhall-0x"));
        assert!(name.ends_with("-abc"));
    }
}
