//! DAO module discovery for the indexer
//!
//! - `classifier` identifies whether a contract is a Governor or a FractalModule
//! - `pages` reads paginated on-chain linked lists (strategies, Safe modules)

mod classifier;
mod pages;

pub use classifier::classify_module;
pub use pages::{PagedList, fetch_pages, get_pages};

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::services::chain::{ChainError, ChainReader};
use crate::utils::serde::{checksum_address, checksum_addresses};

/// A recognized DAO module. Identity comes purely from which interface the
/// contract answered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Module {
    Governor {
        #[serde(with = "checksum_address")]
        address: Address,
        /// In on-chain enumeration order
        #[serde(with = "checksum_addresses")]
        strategies: Vec<Address>,
    },
    FractalModule {
        #[serde(with = "checksum_address")]
        address: Address,
    },
}

impl Module {
    pub fn address(&self) -> Address {
        match self {
            Module::Governor { address, .. } | Module::FractalModule { address } => *address,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Module::Governor { .. } => "Governor",
            Module::FractalModule { .. } => "FractalModule",
        }
    }

    /// Only Governor modules have strategies
    pub fn strategies(&self) -> Option<&[Address]> {
        match self {
            Module::Governor { strategies, .. } => Some(strategies),
            Module::FractalModule { .. } => None,
        }
    }
}

/// Enumerate a Safe's enabled modules and classify each one.
///
/// Unrecognized modules are dropped; the rest keep the Safe's module order.
pub async fn discover_safe_modules(
    reader: &dyn ChainReader,
    safe: Address,
) -> Result<Vec<Module>, ChainError> {
    let enabled = get_pages(reader, safe, PagedList::SafeModules).await?;

    log::info!("Safe {:?} has {} enabled modules", safe, enabled.len());

    let mut modules = Vec::with_capacity(enabled.len());
    for address in enabled {
        match classify_module(reader, address).await? {
            Some(module) => modules.push(module),
            None => log::debug!("Skipping unrecognized module {:?} on Safe {:?}", address, safe),
        }
    }

    Ok(modules)
}
