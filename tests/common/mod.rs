#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use dao_be::AppState;
use dao_be::services::chain::{CallOutcome, ChainError, ChainReader, ContractCall};
use dao_be::utils::env::EnvVars;
use ethers::abi::{Token, encode};
use ethers::providers::ProviderError;
use ethers::types::{Address, Bytes};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Deterministic test address, clear of zero and the sentinel
///
/// NOTE: Keep in sync with `src/utils/test_utils.rs` which serves unit tests.
/// Integration tests can't access #[cfg(test)] items from the library.
pub fn address(n: u64) -> Address {
    Address::from_low_u64_be(1_000 + n)
}

pub fn hex(address: Address) -> String {
    format!("{:?}", address)
}

pub fn encode_addresses(addresses: &[Address]) -> Bytes {
    encode(&[Token::Array(
        addresses.iter().copied().map(Token::Address).collect(),
    )])
    .into()
}

pub fn test_env_vars() -> EnvVars {
    EnvVars {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        multicall3_address: "0xcA11bde05977b3631167028862bE2a173976CA11".parse().unwrap(),
        hats_contract_address: address(500),
        livekit_api_key: Some("APItest".to_string()),
        livekit_api_secret: Some("test-livekit-secret".to_string()),
        livekit_token_ttl_seconds: 600,
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// Chain reader answering from canned data keyed by (target, function)
#[derive(Default)]
pub struct MockChain {
    pub legs: HashMap<(Address, String), CallOutcome>,
    pub reads: HashMap<(Address, String), Bytes>,
    pub fail_batch: bool,
}

impl MockChain {
    pub fn with_leg(mut self, target: Address, function: &str, data: Bytes) -> Self {
        self.legs
            .insert((target, function.to_string()), CallOutcome::Success(data));
        self
    }

    pub fn with_read(mut self, target: Address, function: &str, data: Bytes) -> Self {
        self.reads.insert((target, function.to_string()), data);
        self
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn multicall(&self, calls: &[ContractCall]) -> Result<Vec<CallOutcome>, ChainError> {
        if self.fail_batch {
            return Err(ChainError::Rpc(ProviderError::CustomError(
                "connection refused".to_string(),
            )));
        }

        Ok(calls
            .iter()
            .map(|call| {
                self.legs
                    .get(&(call.target, call.name().to_string()))
                    .cloned()
                    .unwrap_or(CallOutcome::Failure(Bytes::new()))
            })
            .collect())
    }

    async fn call(&self, call: &ContractCall) -> Result<Bytes, ChainError> {
        self.reads
            .get(&(call.target, call.name().to_string()))
            .cloned()
            .ok_or_else(|| {
                ChainError::Rpc(ProviderError::CustomError(format!(
                    "execution reverted: {}",
                    call.name()
                )))
            })
    }
}

pub fn test_app(chain: MockChain) -> Router {
    let state = Arc::new(AppState::with_chain(test_env_vars(), Arc::new(chain)));
    dao_be::routes::create_routes(state)
}

/// Send a request through the router and parse the JSON body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
