use std::sync::Arc;

use axum::{
    Json,
    Router,
    routing::get,
};
use serde_json::json;

use doctor_cell::router::doctor_routes;
use emergency_cell::router::emergency_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let configured = state.is_configured();

    Router::new()
        .route("/", get(|| async { "Medicure API is running!" }))
        .route("/health", get(move || async move {
            Json(json!({
                "status": "ok",
                "configured": configured,
            }))
        }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/emergency", emergency_routes(state))
}
