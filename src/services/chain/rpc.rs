use async_trait::async_trait;
use ethers::abi::Token;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Bytes, TransactionRequest, transaction::eip2718::TypedTransaction};
use std::sync::Arc;

use super::{CallOutcome, ChainError, ChainReader, ContractCall};
use crate::contracts::MULTICALL3_ABI;

/// JSON-RPC backed reader. Batches go through Multicall3 `aggregate3`
/// with `allowFailure` set on every leg.
pub struct RpcChainReader {
    provider: Arc<Provider<Http>>,
    multicall_address: Address,
}

impl RpcChainReader {
    pub fn new(
        http_client: reqwest::Client,
        rpc_url: &str,
        multicall_address: Address,
    ) -> Result<Self, ChainError> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::InvalidUrl(format!("{}: {}", rpc_url, e)))?;

        let provider = Provider::new(Http::new_with_client(url, http_client));

        Ok(Self {
            provider: Arc::new(provider),
            multicall_address,
        })
    }

    async fn eth_call(&self, target: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let tx: TypedTransaction = TransactionRequest::new().to(target).data(calldata).into();
        Ok(self.provider.call(&tx, None).await?)
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn multicall(&self, calls: &[ContractCall]) -> Result<Vec<CallOutcome>, ChainError> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let legs = calls
            .iter()
            .map(|call| {
                Token::Tuple(vec![
                    Token::Address(call.target),
                    Token::Bool(true),
                    Token::Bytes(call.calldata.to_vec()),
                ])
            })
            .collect();

        let aggregate = ContractCall::new(
            &MULTICALL3_ABI,
            self.multicall_address,
            "aggregate3",
            &[Token::Array(legs)],
        )?;

        log::debug!(
            "aggregate3 with {} calls: {}",
            calls.len(),
            calls
                .iter()
                .map(|call| call.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let data = self
            .eth_call(aggregate.target, aggregate.calldata.clone())
            .await?;
        let tokens = aggregate.decode(&data)?;

        let outcomes = parse_aggregate3_results(&aggregate, tokens)?;
        if outcomes.len() != calls.len() {
            return Err(ChainError::LengthMismatch {
                expected: calls.len(),
                actual: outcomes.len(),
            });
        }

        Ok(outcomes)
    }

    async fn call(&self, call: &ContractCall) -> Result<Bytes, ChainError> {
        self.eth_call(call.target, call.calldata.clone()).await
    }
}

/// Convert `Result3[]` tokens into per-leg outcomes
fn parse_aggregate3_results(
    aggregate: &ContractCall,
    tokens: Vec<Token>,
) -> Result<Vec<CallOutcome>, ChainError> {
    let invalid = |reason: &str| ChainError::Decode {
        function: aggregate.name().to_string(),
        reason: reason.to_string(),
    };

    let results = tokens
        .into_iter()
        .next()
        .and_then(Token::into_array)
        .ok_or_else(|| invalid("expected Result3[]"))?;

    results
        .into_iter()
        .map(|result| match result {
            Token::Tuple(fields) => match fields.as_slice() {
                [Token::Bool(true), Token::Bytes(data)] => {
                    Ok(CallOutcome::Success(data.clone().into()))
                }
                [Token::Bool(false), Token::Bytes(data)] => {
                    Ok(CallOutcome::Failure(data.clone().into()))
                }
                _ => Err(invalid("expected (bool, bytes)")),
            },
            _ => Err(invalid("expected tuple")),
        })
        .collect()
}
