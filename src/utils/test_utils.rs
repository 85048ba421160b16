//! Test utilities shared by the service unit tests
//!
//! `MockChain` answers multicall legs and single reads from canned data keyed
//! by target address and function name. Paged reads are keyed by cursor so
//! tests can assert exactly which pages were requested.

use async_trait::async_trait;
use ethers::abi::{Token, encode};
use ethers::providers::ProviderError;
use ethers::types::{Address, Bytes, U256};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::contracts::SENTINEL_ADDRESS;
use crate::services::chain::{CallOutcome, ChainError, ChainReader, ContractCall};

const PAGED_METHODS: [&str; 2] = ["getStrategies", "getModulesPaginated"];

/// Deterministic test address, clear of zero and the sentinel
pub fn address(n: u64) -> Address {
    Address::from_low_u64_be(1_000 + n)
}

pub fn addresses(start: u64, count: usize) -> Vec<Address> {
    (0..count as u64).map(|i| address(start + i)).collect()
}

pub fn encode_bytes32() -> Bytes {
    encode(&[Token::FixedBytes(vec![0xab; 32])]).into()
}

pub fn encode_address(address: Address) -> Bytes {
    encode(&[Token::Address(address)]).into()
}

pub fn encode_bool(value: bool) -> Bytes {
    encode(&[Token::Bool(value)]).into()
}

pub fn encode_uint(value: u64) -> Bytes {
    encode(&[Token::Uint(U256::from(value))]).into()
}

pub fn encode_addresses(addresses: &[Address]) -> Bytes {
    encode(&[Token::Array(
        addresses.iter().copied().map(Token::Address).collect(),
    )])
    .into()
}

/// `(address[] array, address next)` as returned by paged getters
pub fn encode_page(page: &[Address]) -> Bytes {
    let next = page.last().copied().unwrap_or(SENTINEL_ADDRESS);
    encode(&[
        Token::Array(page.iter().copied().map(Token::Address).collect()),
        Token::Address(next),
    ])
    .into()
}

fn rpc_error(message: String) -> ChainError {
    ChainError::Rpc(ProviderError::CustomError(message))
}

#[derive(Default)]
pub struct MockChain {
    legs: HashMap<(Address, String), CallOutcome>,
    reads: HashMap<(Address, String), Bytes>,
    pages: HashMap<(Address, Address), Vec<Address>>,
    fail_batch: bool,
    page_requests: Mutex<Vec<Address>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome for a multicall leg. Unregistered legs fail.
    pub fn with_leg(mut self, target: Address, function: &str, outcome: CallOutcome) -> Self {
        self.legs.insert((target, function.to_string()), outcome);
        self
    }

    /// Output for a single read. Unregistered reads revert.
    pub fn with_read(mut self, target: Address, function: &str, data: Bytes) -> Self {
        self.reads.insert((target, function.to_string()), data);
        self
    }

    /// Page returned when `contract` is read starting after `cursor`
    pub fn with_page(mut self, contract: Address, cursor: Address, page: Vec<Address>) -> Self {
        self.pages.insert((contract, cursor), page);
        self
    }

    pub fn with_failing_batch(mut self) -> Self {
        self.fail_batch = true;
        self
    }

    pub fn governor(self, target: Address, first_page: Vec<Address>) -> Self {
        self.with_leg(target, "DOMAIN_SEPARATOR_TYPEHASH", CallOutcome::Success(encode_bytes32()))
            .with_leg(target, "TRANSACTION_TYPEHASH", CallOutcome::Success(encode_bytes32()))
            .with_leg(target, "getStrategies", CallOutcome::Success(encode_page(&first_page)))
    }

    pub fn fractal_module(self, target: Address) -> Self {
        self.with_leg(target, "avatar", CallOutcome::Success(encode_address(address(999))))
            .with_leg(target, "controllers", CallOutcome::Success(encode_bool(false)))
    }

    /// Cursors of every paged read, in request order
    pub fn page_requests(&self) -> Vec<Address> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn multicall(&self, calls: &[ContractCall]) -> Result<Vec<CallOutcome>, ChainError> {
        if self.fail_batch {
            return Err(rpc_error("connection refused".to_string()));
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
        if PAGED_METHODS.contains(&call.name()) {
            let cursor = call
                .function
                .decode_input(&call.calldata[4..])
                .ok()
                .and_then(|args| args.into_iter().next())
                .and_then(Token::into_address)
                .expect("paged call without cursor");
            self.page_requests.lock().unwrap().push(cursor);

            return self
                .pages
                .get(&(call.target, cursor))
                .map(|page| encode_page(page))
                .ok_or_else(|| rpc_error(format!("no page after {:?}", cursor)));
        }

        self.reads
            .get(&(call.target, call.name().to_string()))
            .cloned()
            .ok_or_else(|| rpc_error(format!("execution reverted: {}", call.name())))
    }
}
