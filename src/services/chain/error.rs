use ethers::providers::ProviderError;
use ethers::types::Address;
use thiserror::Error;

/// Errors surfaced by chain reads.
///
/// A single multicall leg reverting is not an error; only the batch itself,
/// a standalone read, or pagination can produce one of these.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] ProviderError),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    #[error("ABI encoding error for {function}: {reason}")]
    Encode { function: String, reason: String },

    #[error("Failed to decode {function} output: {reason}")]
    Decode { function: String, reason: String },

    #[error("Multicall returned {actual} results for {expected} calls")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("{method} on {contract:?} did not terminate within {max_pages} pages")]
    PageLimitExceeded {
        contract: Address,
        method: &'static str,
        max_pages: usize,
    },

    #[error("{method} on {contract:?} revisited cursor {cursor:?}")]
    CyclicPage {
        contract: Address,
        method: &'static str,
        cursor: Address,
    },
}
