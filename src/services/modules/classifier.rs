//! Module classification by interface probing
//!
//! There is no on-chain registry of module kinds, so a module is identified
//! by which interface it answers to. One multicall probes both candidate
//! interfaces; each shape lists the legs that must succeed for it to match
//! and shapes are tried in order.

use ethers::abi::Token;
use ethers::types::Address;

use super::Module;
use super::pages::{PagedList, fetch_pages};
use crate::contracts::{FRACTAL_MODULE_ABI, GOVERNOR_ABI, PAGE_SIZE, SENTINEL_ADDRESS};
use crate::services::chain::{ChainError, ChainReader, ContractCall, address_list};

const DOMAIN_SEPARATOR_TYPEHASH: usize = 0;
const TRANSACTION_TYPEHASH: usize = 1;
const GET_STRATEGIES: usize = 2;
const AVATAR: usize = 3;
const CONTROLLERS: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Governor,
    FractalModule,
}

/// Evaluation order, first match wins
const SHAPES: [Shape; 2] = [Shape::Governor, Shape::FractalModule];

impl Shape {
    fn required_legs(&self) -> &'static [usize] {
        match self {
            Shape::Governor => &[DOMAIN_SEPARATOR_TYPEHASH, TRANSACTION_TYPEHASH, GET_STRATEGIES],
            Shape::FractalModule => &[AVATAR, CONTROLLERS],
        }
    }
}

fn probe_calls(address: Address) -> Result<Vec<ContractCall>, ChainError> {
    Ok(vec![
        ContractCall::new(&GOVERNOR_ABI, address, "DOMAIN_SEPARATOR_TYPEHASH", &[])?,
        ContractCall::new(&GOVERNOR_ABI, address, "TRANSACTION_TYPEHASH", &[])?,
        PagedList::GovernorStrategies.page_call(address, SENTINEL_ADDRESS)?,
        ContractCall::new(&FRACTAL_MODULE_ABI, address, "avatar", &[])?,
        // Only the presence of `controllers` matters, not its value
        ContractCall::new(
            &FRACTAL_MODULE_ABI,
            address,
            "controllers",
            &[Token::Address(SENTINEL_ADDRESS)],
        )?,
    ])
}

/// Classify the contract at `address`.
///
/// Returns `Ok(None)` for contracts that match neither interface; callers
/// should skip those. Individual probe failures drive the classification and
/// are never returned as errors; a failure of the batch itself is.
pub async fn classify_module(
    reader: &dyn ChainReader,
    address: Address,
) -> Result<Option<Module>, ChainError> {
    let calls = probe_calls(address)?;
    let outcomes = reader.multicall(&calls).await?;
    if outcomes.len() != calls.len() {
        return Err(ChainError::LengthMismatch {
            expected: calls.len(),
            actual: outcomes.len(),
        });
    }

    let mut decoded: Vec<Option<Vec<Token>>> = outcomes
        .iter()
        .zip(&calls)
        .map(|(outcome, call)| outcome.decoded(call))
        .collect();

    let shape = SHAPES.into_iter().find(|shape| {
        shape
            .required_legs()
            .iter()
            .all(|&leg| decoded[leg].is_some())
    });

    let module = match shape {
        Some(Shape::Governor) => {
            let first_page = decoded[GET_STRATEGIES].take().unwrap_or_default();
            let mut strategies = address_list(&calls[GET_STRATEGIES], first_page)?;

            let cursor = strategies
                .last()
                .copied()
                .filter(|_| strategies.len() == PAGE_SIZE);
            if let Some(cursor) = cursor {
                let more = fetch_pages(reader, address, PagedList::GovernorStrategies, cursor).await?;
                strategies.extend(more);
            }

            Module::Governor {
                address,
                strategies,
            }
        }
        Some(Shape::FractalModule) => Module::FractalModule { address },
        None => {
            log::debug!("{:?} is not a recognized module", address);
            return Ok(None);
        }
    };

    log::debug!("Classified {:?} as {}", address, module.type_name());
    Ok(Some(module))
}
