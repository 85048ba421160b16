use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{AppState, handlers};

async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "townHall": {
            "sessions": state.sessions.len().await
        }
    }))
}

pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Module classification endpoints
        .route(
            "/api/modules/{address}",
            get(handlers::modules::get_module),
        )
        .route(
            "/api/safes/{address}/modules",
            get(handlers::modules::get_safe_modules),
        )
        // Town Hall endpoints
        .route(
            "/api/town-hall/sessions",
            get(handlers::town_hall::sessions::list_sessions)
                .post(handlers::town_hall::sessions::create_session),
        )
        .route(
            "/api/town-hall/sessions/{id}/start",
            post(handlers::town_hall::sessions::start_session),
        )
        .route(
            "/api/town-hall/sessions/{id}/join",
            post(handlers::town_hall::join::join_session),
        )
        .route(
            "/api/town-hall/sessions/{id}/end",
            post(handlers::town_hall::sessions::end_session),
        )
        .with_state(state)
}
