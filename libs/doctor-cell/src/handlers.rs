use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::{DoctorError, DoctorSearchRequest, UpdateAvailabilityRequest};
use crate::services::matching::DoctorMatchingService;
use crate::services::provider::ProviderAvailabilityService;

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub symptom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SymptomQuery {
    pub symptom: String,
}

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::InvalidQuery(msg) => AppError::BadRequest(msg),
        DoctorError::StorageUnavailable(msg) => AppError::StorageUnavailable(msg),
        DoctorError::NotFound(msg) => AppError::NotFound(msg),
    }
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let matching_service = DoctorMatchingService::new(&state);

    let request = DoctorSearchRequest {
        symptom: query.symptom,
        latitude: query.latitude,
        longitude: query.longitude,
        radius_km: query.radius_km,
        limit: query.limit,
    };

    let results = matching_service.search_results(&request).await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "total": results.doctors.len(),
        "doctors": results.doctors,
        "specialties": results.specialties,
    })))
}

#[axum::debug_handler]
pub async fn classify_symptom(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SymptomQuery>,
) -> Result<Json<Value>, AppError> {
    let matching_service = DoctorMatchingService::new(&state);

    Ok(Json(json!({
        "symptom": query.symptom,
        "specialties": matching_service.specialties_for(&query.symptom),
    })))
}

// ==============================================================================
// PROTECTED HANDLERS (AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_provider_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let availability_service = ProviderAvailabilityService::new(&state);

    let availability = availability_service
        .status_at(doctor_id, Utc::now(), auth.token())
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!(availability)))
}

#[axum::debug_handler]
pub async fn update_provider_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is(&doctor_id) && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to change this doctor's availability".to_string()));
    }

    let availability_service = ProviderAvailabilityService::new(&state);

    let availability = availability_service
        .set_available_at(doctor_id, request.available_now, Utc::now(), auth.token())
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "availability": availability,
        "message": if request.available_now {
            "Doctor is now accepting patients"
        } else {
            "Doctor is now unavailable"
        }
    })))
}
