use axum::{Router, http::HeaderValue};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use dao_be::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let state = Arc::new(AppState::new().expect("Failed to initialize app state"));

    let allowed_origins = &state.env_vars.cors_allowed_origins;
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        log::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                        None
                    }
                }),
        )
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(dao_be::routes::create_routes(state))
        .layer(cors);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    log::info!("Server running on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
