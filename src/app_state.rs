use std::sync::Arc;

use crate::{
    services::{ChainReader, RpcChainReader, SessionStore, membership::HatRole},
    utils::{cache::Cache, env::EnvVars},
};
use ethers::types::U256;

pub struct AppState {
    pub chain: Arc<dyn ChainReader>,
    pub cache: Cache,
    pub sessions: SessionStore,
    pub env_vars: EnvVars,
}

impl AppState {
    /// Initialize the application state from the environment
    pub fn new() -> Result<AppState, Box<dyn std::error::Error>> {
        let env_vars = EnvVars::default();

        log::info!("Connecting to RPC endpoint {}", env_vars.rpc_url);
        let chain = RpcChainReader::new(
            reqwest::Client::new(),
            &env_vars.rpc_url,
            env_vars.multicall3_address,
        )?;

        if env_vars.livekit_api_key.is_none() || env_vars.livekit_api_secret.is_none() {
            log::info!("No LiveKit credentials found, Town Hall tokens will be placeholders");
        }

        Ok(Self::with_chain(env_vars, Arc::new(chain)))
    }

    /// Build state around an existing chain reader
    pub fn with_chain(env_vars: EnvVars, chain: Arc<dyn ChainReader>) -> AppState {
        AppState {
            chain,
            cache: Cache::new(),
            sessions: SessionStore::new(),
            env_vars,
        }
    }

    /// Hats role on the configured Hats contract
    pub fn hat_role(&self, hat_id: U256) -> HatRole {
        HatRole {
            contract: self.env_vars.hats_contract_address,
            hat_id,
        }
    }
}
