//! ABI fragments for the contracts the backend reads, plus shared chain constants.
//!
//! Only the read-only functions we actually probe are declared. The DAO module
//! interfaces are the legacy Governor and FractalModule contracts; Safe, ERC20
//! and Hats back the Town Hall membership check.

use ethers::abi::{Abi, parse_abi};
use ethers::types::{Address, H160};
use std::sync::LazyLock;

/// Entries requested per paginated call
pub const PAGE_SIZE: usize = 100;

/// Upper bound on continuation pages fetched for a single list
pub const MAX_PAGES: usize = 100;

/// Linked-list head used by Safe-style contracts (`address(0x1)`)
pub const SENTINEL_ADDRESS: Address = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

/// Multicall3 is deployed at the same address on every supported chain
pub const DEFAULT_MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Hats Protocol v1
pub const DEFAULT_HATS_ADDRESS: &str = "0x3bc1A0Ad72417f2d411118085256fC53CBdDd137";

pub static GOVERNOR_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&[
        "function DOMAIN_SEPARATOR_TYPEHASH() external view returns (bytes32)",
        "function TRANSACTION_TYPEHASH() external view returns (bytes32)",
        "function getStrategies(address startAddress, uint256 count) external view returns (address[] array, address next)",
    ])
    .expect("Invalid Governor ABI")
});

pub static FRACTAL_MODULE_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&[
        "function avatar() external view returns (address)",
        "function controllers(address controller) external view returns (bool)",
    ])
    .expect("Invalid FractalModule ABI")
});

pub static SAFE_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&[
        "function getOwners() external view returns (address[])",
        "function getModulesPaginated(address start, uint256 pageSize) external view returns (address[] array, address next)",
    ])
    .expect("Invalid Safe ABI")
});

pub static ERC20_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&["function balanceOf(address account) external view returns (uint256)"])
        .expect("Invalid ERC20 ABI")
});

pub static HATS_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&[
        "function isWearerOfHat(address user, uint256 hatId) external view returns (bool isWearer)",
    ])
    .expect("Invalid Hats ABI")
});

pub static MULTICALL3_ABI: LazyLock<Abi> = LazyLock::new(|| {
    parse_abi(&[
        "struct Call3 { address target; bool allowFailure; bytes callData; }",
        "struct Result3 { bool success; bytes returnData; }",
        "function aggregate3(Call3[] calls) external payable returns (Result3[] returnData)",
    ])
    .expect("Invalid Multicall3 ABI")
});
