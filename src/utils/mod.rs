pub mod cache;
pub mod env;
pub mod serde;

#[cfg(test)]
pub mod test_utils;
