use ethers::types::Address;

use crate::contracts::{DEFAULT_HATS_ADDRESS, DEFAULT_MULTICALL3_ADDRESS};
use crate::services::livekit::LiveKitConfig;

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub rpc_url: String,
    pub multicall3_address: Address,
    pub hats_contract_address: Address,
    // LiveKit room token configuration
    pub livekit_api_key: Option<String>,
    pub livekit_api_secret: Option<String>,
    pub livekit_token_ttl_seconds: u64,
    // CORS configuration
    pub cors_allowed_origins: Vec<String>,
}

impl EnvVars {
    pub fn livekit_config(&self) -> LiveKitConfig {
        LiveKitConfig {
            api_key: self.livekit_api_key.clone(),
            api_secret: self.livekit_api_secret.clone(),
            token_ttl_secs: self.livekit_token_ttl_seconds,
        }
    }
}

impl Default for EnvVars {
    fn default() -> Self {
        Self {
            rpc_url: std::env::var("RPC_URL").expect("RPC_URL is not set"),
            multicall3_address: std::env::var("MULTICALL3_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_MULTICALL3_ADDRESS.to_string())
                .parse()
                .expect("Invalid MULTICALL3_ADDRESS"),
            hats_contract_address: std::env::var("HATS_CONTRACT_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_HATS_ADDRESS.to_string())
                .parse()
                .expect("Invalid HATS_CONTRACT_ADDRESS"),
            livekit_api_key: std::env::var("LIVEKIT_API_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            livekit_api_secret: std::env::var("LIVEKIT_API_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            livekit_token_ttl_seconds: std::env::var("LIVEKIT_TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(6 * 60 * 60), // Default: 6 hours
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3001,http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
