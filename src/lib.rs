pub mod app_state;
pub mod contracts;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod utils;

pub use app_state::AppState;
