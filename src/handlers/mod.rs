pub mod error;
pub mod modules;
pub mod town_hall;

pub use error::ApiError;

use ethers::types::Address;

/// Parse a user-supplied address, accepting any casing
pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} address: {}", field, value)))
}
