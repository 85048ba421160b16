//! DAO module classification endpoints for the indexer

use axum::{
    Json,
    extract::{Path, State},
};
use ethers::utils::to_checksum;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    AppState,
    handlers::{ApiError, parse_address},
    services::{Module, classify_module, discover_safe_modules},
    utils::cache::{CacheKey, CacheTier},
};

#[derive(Debug, Serialize)]
pub struct ModuleResponse {
    /// `null` when the contract is not a recognized module
    pub module: Option<Module>,
}

#[derive(Debug, Serialize)]
pub struct SafeModulesResponse {
    pub modules: Vec<Module>,
}

/// Classify the contract at an address
///
/// GET /api/modules/{address}
pub async fn get_module(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<ModuleResponse>, ApiError> {
    let address = parse_address("module", &address)?;
    let cache_key = CacheKey::new("module")
        .with(to_checksum(&address, None))
        .build();

    let chain = state.chain.clone();
    let module = state
        .cache
        .cached(CacheTier::LongTerm, cache_key, async move {
            classify_module(chain.as_ref(), address)
                .await
                .map_err(ApiError::from)
        })
        .await?;

    Ok(Json(ModuleResponse { module }))
}

/// Enabled modules of a Safe that are recognized DAO modules
///
/// GET /api/safes/{address}/modules
pub async fn get_safe_modules(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<SafeModulesResponse>, ApiError> {
    let safe = parse_address("safe", &address)?;
    let cache_key = CacheKey::new("safe-modules")
        .with(to_checksum(&safe, None))
        .build();

    let chain = state.chain.clone();
    let modules = state
        .cache
        .cached(CacheTier::ShortTerm, cache_key, async move {
            discover_safe_modules(chain.as_ref(), safe)
                .await
                .map_err(ApiError::from)
        })
        .await?;

    Ok(Json(SafeModulesResponse { modules }))
}
