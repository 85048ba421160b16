//! Town Hall session endpoints
//!
//! Sessions are scheduled per DAO (Safe address). Joining verifies on-chain
//! membership and returns a room token for the session's media room.

pub mod join;
pub mod sessions;
