//! Services module for chain access and business logic

pub mod chain;
pub mod livekit;
pub mod membership;
pub mod modules;
pub mod town_hall;

pub use chain::{ChainError, ChainReader, RpcChainReader};
pub use modules::{Module, classify_module, discover_safe_modules};
pub use town_hall::SessionStore;
