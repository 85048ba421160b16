//! On-chain DAO membership checks gating the Town Hall
//!
//! A user is a member if any probe succeeds, checked in order:
//! Safe signer, governance token holder, Hats role wearer.
//! A probe that reverts or errors counts as "not a member" for that probe.

use ethers::abi::Token;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::{ERC20_ABI, HATS_ABI, SAFE_ABI};
use crate::services::chain::{ChainError, ChainReader, ContractCall, address_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipType {
    Signer,
    TokenHolder,
    HatsRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheckResult {
    pub has_access: bool,
    pub membership_type: Option<MembershipType>,
}

impl AccessCheckResult {
    fn granted(membership_type: MembershipType) -> Self {
        Self {
            has_access: true,
            membership_type: Some(membership_type),
        }
    }

    fn denied() -> Self {
        Self {
            has_access: false,
            membership_type: None,
        }
    }
}

/// A Hats Protocol role that grants access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatRole {
    pub contract: Address,
    pub hat_id: U256,
}

/// Parse a hat id given either as decimal or `0x` hex
pub fn parse_hat_id(value: &str) -> Option<U256> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(value).ok(),
    }
}

async fn is_safe_signer(reader: &dyn ChainReader, safe: Address, user: Address) -> Result<bool, ChainError> {
    let call = ContractCall::new(&SAFE_ABI, safe, "getOwners", &[])?;
    let owners = address_list(&call, reader.read(&call).await?)?;
    Ok(owners.contains(&user))
}

async fn has_governance_tokens(
    reader: &dyn ChainReader,
    token: Address,
    user: Address,
) -> Result<bool, ChainError> {
    let call = ContractCall::new(&ERC20_ABI, token, "balanceOf", &[Token::Address(user)])?;
    let balance = reader
        .read(&call)
        .await?
        .into_iter()
        .next()
        .and_then(Token::into_uint)
        .unwrap_or_default();
    Ok(!balance.is_zero())
}

async fn wears_hat(reader: &dyn ChainReader, hat: HatRole, user: Address) -> Result<bool, ChainError> {
    let call = ContractCall::new(
        &HATS_ABI,
        hat.contract,
        "isWearerOfHat",
        &[Token::Address(user), Token::Uint(hat.hat_id)],
    )?;
    Ok(reader
        .read(&call)
        .await?
        .into_iter()
        .next()
        .and_then(Token::into_bool)
        .unwrap_or(false))
}

fn or_not_member(probe: &str, result: Result<bool, ChainError>) -> bool {
    result.unwrap_or_else(|e| {
        log::debug!("Membership probe {} failed: {}", probe, e);
        false
    })
}

/// Verify on-chain DAO membership for Town Hall access
pub async fn check_dao_membership(
    reader: &dyn ChainReader,
    safe: Address,
    user: Address,
    governance_token: Option<Address>,
    hat: Option<HatRole>,
) -> AccessCheckResult {
    if or_not_member("getOwners", is_safe_signer(reader, safe, user).await) {
        return AccessCheckResult::granted(MembershipType::Signer);
    }

    let holds_tokens = match governance_token {
        Some(token) => or_not_member("balanceOf", has_governance_tokens(reader, token, user).await),
        None => false,
    };
    if holds_tokens {
        return AccessCheckResult::granted(MembershipType::TokenHolder);
    }

    let wears_role = match hat {
        Some(hat) => or_not_member("isWearerOfHat", wears_hat(reader, hat, user).await),
        None => false,
    };
    if wears_role {
        return AccessCheckResult::granted(MembershipType::HatsRole);
    }

    AccessCheckResult::denied()
}
