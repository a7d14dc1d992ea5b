use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub sub_specialty: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
    pub id: Uuid,
    pub location_type: String, // clinic, hospital, ...
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ServiceLocation {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Weekly window during which a doctor accepts patients at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    #[serde(default)]
    pub is_24_hours: bool,
    pub day_of_week: Option<i32>, // ISO: 1 = Monday ... 7 = Sunday
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: bool,
}

/// One (doctor, location, window) tuple from the doctor directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub doctor: Doctor,
    pub location: ServiceLocation,
    #[serde(flatten)]
    pub window: AvailabilityWindow,
}

/// Search result row. Computed per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub doctor_id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub sub_specialty: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location_id: Uuid,
    pub location_type: String,
    pub clinic_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub is_24_hours: bool,
    pub is_available: bool,
}

impl MatchCandidate {
    pub fn new(doctor: &Doctor, location: &ServiceLocation, coordinates: (f64, f64), distance_km: f64, is_24_hours: bool) -> Self {
        Self {
            doctor_id: doctor.id,
            full_name: doctor.full_name.clone(),
            specialty: doctor.specialty.clone(),
            sub_specialty: doctor.sub_specialty.clone(),
            phone: doctor.phone.clone(),
            email: doctor.email.clone(),
            location_id: location.id,
            location_type: location.location_type.clone(),
            clinic_name: location.name.clone(),
            address: location.address.clone(),
            city: location.city.clone(),
            latitude: coordinates.0,
            longitude: coordinates.1,
            distance_km,
            is_24_hours,
            is_available: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSearchRequest {
    pub symptom: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Ranked candidates together with the specialties the symptom mapped to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorSearchResults {
    pub specialties: Vec<String>,
    pub doctors: Vec<MatchCandidate>,
}

/// Provider-controlled availability of one doctor across all their windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAvailability {
    pub doctor_id: Uuid,
    /// The doctor's own switch: true if any window is enabled.
    pub available_now: bool,
    /// Whether an enabled window covers the current clinic-local time.
    pub open_now: bool,
    pub windows: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub available_now: bool,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor directory unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid search: {0}")]
    InvalidQuery(String),

    #[error("Doctor not found: {0}")]
    NotFound(String),
}
