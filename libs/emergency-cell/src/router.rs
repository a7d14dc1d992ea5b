use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{
    accept_emergency_request,
    create_emergency_request,
    decline_emergency_request,
    get_emergency_request,
    list_doctor_emergency_requests,
};

pub fn emergency_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/requests", post(create_emergency_request))
        .route("/requests/{request_id}", get(get_emergency_request))
        .route("/requests/{request_id}/accept", post(accept_emergency_request))
        .route("/requests/{request_id}/decline", post(decline_emergency_request))
        .route("/doctors/{doctor_id}/requests", get(list_doctor_emergency_requests))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
