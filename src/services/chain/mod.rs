//! Read-only access to EVM contracts
//!
//! `ChainReader` is the seam between the indexing helpers and the RPC layer.
//! It offers two operations: a failure-tolerant batch of calls where every
//! leg reports success or failure independently, and a single call where any
//! failure is an error.

mod error;
mod rpc;

pub use error::ChainError;
pub use rpc::RpcChainReader;

use async_trait::async_trait;
use ethers::abi::{Abi, Function, Token};
use ethers::types::{Address, Bytes};

/// A read-only call against one contract function
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub target: Address,
    pub function: &'static Function,
    pub calldata: Bytes,
}

impl ContractCall {
    /// Encode a call to `name` on the given interface
    pub fn new(
        abi: &'static Abi,
        target: Address,
        name: &str,
        args: &[Token],
    ) -> Result<Self, ChainError> {
        let function = abi.function(name).map_err(|e| ChainError::Encode {
            function: name.to_string(),
            reason: e.to_string(),
        })?;
        let calldata = function
            .encode_input(args)
            .map_err(|e| ChainError::Encode {
                function: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            target,
            function,
            calldata: calldata.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode return data against the function's declared outputs
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Token>, ChainError> {
        self.function
            .decode_output(data)
            .map_err(|e| ChainError::Decode {
                function: self.function.name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Per-leg result of a multicall
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(Bytes),
    Failure(Bytes),
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    /// Decoded output of a successful leg.
    ///
    /// Return data that does not match the function's outputs counts as a
    /// failed leg: calls to accounts without code succeed with empty data.
    pub fn decoded(&self, call: &ContractCall) -> Option<Vec<Token>> {
        match self {
            CallOutcome::Success(data) => call.decode(data).ok(),
            CallOutcome::Failure(_) => None,
        }
    }
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute all calls in one batch. Outcomes are returned in call order;
    /// a reverting leg never aborts the batch.
    async fn multicall(&self, calls: &[ContractCall]) -> Result<Vec<CallOutcome>, ChainError>;

    /// Execute a single call and return its raw output
    async fn call(&self, call: &ContractCall) -> Result<Bytes, ChainError>;

    /// Execute a single call and decode its output
    async fn read(&self, call: &ContractCall) -> Result<Vec<Token>, ChainError> {
        let data = self.call(call).await?;
        call.decode(&data)
    }
}

/// Extract an `address[]` from the first output token
pub fn address_list(call: &ContractCall, tokens: Vec<Token>) -> Result<Vec<Address>, ChainError> {
    let invalid = || ChainError::Decode {
        function: call.name().to_string(),
        reason: "expected address[] as first output".to_string(),
    };

    tokens
        .into_iter()
        .next()
        .and_then(Token::into_array)
        .ok_or_else(invalid)?
        .into_iter()
        .map(|token| token.into_address().ok_or_else(invalid))
        .collect()
}
