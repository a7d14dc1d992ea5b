// libs/emergency-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::error::EmergencyError;
use crate::models::{CreateEmergencyRequest, EmergencyListQuery, NewEmergencyRequest};
use crate::services::tracker::EmergencyRequestService;

fn map_emergency_error(e: EmergencyError) -> AppError {
    match e {
        EmergencyError::NotFound(id) => AppError::NotFound(format!("Emergency request {} not found", id)),
        EmergencyError::InvalidTransition { .. } => AppError::Conflict(e.to_string()),
        EmergencyError::UpdateRefused(_) => AppError::Auth(e.to_string()),
        EmergencyError::ValidationError(msg) => AppError::ValidationError(msg),
        EmergencyError::StorageUnavailable(msg) => AppError::StorageUnavailable(msg),
    }
}

fn user_uuid(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid user ID format".to_string()))
}

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_emergency_request(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(body): Json<CreateEmergencyRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user_uuid(&user)?;
    info!("Emergency request from patient {} for doctor {}", patient_id, body.doctor_id);

    let service = EmergencyRequestService::new(&state, auth.token());
    let request = service
        .create(NewEmergencyRequest::from_body(patient_id, body))
        .await
        .map_err(map_emergency_error)?;

    Ok(Json(json!({
        "request_id": request.id,
        "request": request,
    })))
}

#[axum::debug_handler]
pub async fn get_emergency_request(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = EmergencyRequestService::new(&state, auth.token());
    let request = service.get(request_id).await.map_err(map_emergency_error)?;

    if !user.is_admin() && !request.involves(user_uuid(&user)?) {
        return Err(AppError::Auth("Not authorized to view this emergency request".to_string()));
    }

    Ok(Json(json!(request)))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn accept_emergency_request(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = EmergencyRequestService::new(&state, auth.token());
    authorize_target_doctor(&service, &user, request_id).await?;

    let request = service.accept(request_id).await.map_err(map_emergency_error)?;

    Ok(Json(json!({
        "request": request,
        "message": "Emergency request accepted",
    })))
}

#[axum::debug_handler]
pub async fn decline_emergency_request(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = EmergencyRequestService::new(&state, auth.token());
    authorize_target_doctor(&service, &user, request_id).await?;

    let request = service.decline(request_id).await.map_err(map_emergency_error)?;

    Ok(Json(json!({
        "request": request,
        "message": "Emergency request declined",
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_emergency_requests(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<EmergencyListQuery>,
) -> Result<Json<Value>, AppError> {
    if !user.is(&doctor_id) && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this doctor's emergency requests".to_string()));
    }

    let service = EmergencyRequestService::new(&state, auth.token());
    let requests = service
        .list_for_doctor(doctor_id, query.status)
        .await
        .map_err(map_emergency_error)?;

    Ok(Json(json!({
        "requests": requests,
        "total": requests.len(),
    })))
}

async fn authorize_target_doctor(
    service: &EmergencyRequestService,
    user: &User,
    request_id: Uuid,
) -> Result<(), AppError> {
    let request = service.get(request_id).await.map_err(map_emergency_error)?;

    if user.is_admin() || user.is(&request.doctor_id) {
        Ok(())
    } else {
        Err(AppError::Auth("Only the requested doctor can respond to this emergency".to_string()))
    }
}
