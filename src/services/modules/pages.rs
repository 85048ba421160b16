//! Paged reads of on-chain linked lists
//!
//! Safe-style contracts expose their internal linked lists through
//! `method(start, pageSize) -> (address[] array, address next)`. Pages are
//! requested sequentially: a full page means there may be more entries, and
//! the last returned entry becomes the exclusive start of the next page.

use ethers::abi::{Abi, Token};
use ethers::types::{Address, U256};
use std::collections::HashSet;

use crate::contracts::{GOVERNOR_ABI, MAX_PAGES, PAGE_SIZE, SAFE_ABI, SENTINEL_ADDRESS};
use crate::services::chain::{ChainError, ChainReader, ContractCall, address_list};

/// A paginated list exposed by a module contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagedList {
    /// `Governor.getStrategies(startAddress, count)`
    GovernorStrategies,
    /// `Safe.getModulesPaginated(start, pageSize)`
    SafeModules,
}

impl PagedList {
    pub fn module_type(&self) -> &'static str {
        match self {
            PagedList::GovernorStrategies => "Governor",
            PagedList::SafeModules => "Safe",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            PagedList::GovernorStrategies => "getStrategies",
            PagedList::SafeModules => "getModulesPaginated",
        }
    }

    fn abi(&self) -> &'static Abi {
        match self {
            PagedList::GovernorStrategies => &GOVERNOR_ABI,
            PagedList::SafeModules => &SAFE_ABI,
        }
    }

    /// Build the call for the page starting after `cursor`
    pub fn page_call(&self, contract: Address, cursor: Address) -> Result<ContractCall, ChainError> {
        ContractCall::new(
            self.abi(),
            contract,
            self.method(),
            &[Token::Address(cursor), Token::Uint(U256::from(PAGE_SIZE as u64))],
        )
    }
}

/// Fetch the whole list from the sentinel.
///
/// The first page is not a continuation, so up to `MAX_PAGES` further pages
/// follow it.
pub async fn get_pages(
    reader: &dyn ChainReader,
    contract: Address,
    list: PagedList,
) -> Result<Vec<Address>, ChainError> {
    read_pages(reader, contract, list, SENTINEL_ADDRESS, MAX_PAGES + 1).await
}

/// Fetch the continuation pages after `start`, at most `MAX_PAGES` of them.
pub async fn fetch_pages(
    reader: &dyn ChainReader,
    contract: Address,
    list: PagedList,
    start: Address,
) -> Result<Vec<Address>, ChainError> {
    read_pages(reader, contract, list, start, MAX_PAGES).await
}

/// Read pages after `start` concatenated in call order.
///
/// Stops at the first short page. Any failed page fails the whole read so a
/// truncated list is never returned as complete.
async fn read_pages(
    reader: &dyn ChainReader,
    contract: Address,
    list: PagedList,
    start: Address,
    max_requests: usize,
) -> Result<Vec<Address>, ChainError> {
    let mut entries = Vec::new();
    let mut cursor = start;
    let mut visited = HashSet::from([SENTINEL_ADDRESS, start]);

    for page_number in 0..max_requests {
        let call = list.page_call(contract, cursor)?;
        let tokens = reader.read(&call).await?;
        let page = address_list(&call, tokens)?;

        log::debug!(
            "{}.{} on {:?}: page {} returned {} entries",
            list.module_type(),
            list.method(),
            contract,
            page_number,
            page.len()
        );

        let next = match page.last() {
            Some(last) if page.len() == PAGE_SIZE => Some(*last),
            _ => None,
        };
        entries.extend(page);

        match next {
            None => return Ok(entries),
            Some(next) if !visited.insert(next) => {
                return Err(ChainError::CyclicPage {
                    contract,
                    method: list.method(),
                    cursor: next,
                });
            }
            Some(next) => cursor = next,
        }
    }

    Err(ChainError::PageLimitExceeded {
        contract,
        method: list.method(),
        max_pages: MAX_PAGES,
    })
}
