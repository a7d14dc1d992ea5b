// libs/emergency-cell/src/services/tracker.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use doctor_cell::services::geo::Coordinates;
use shared_config::AppConfig;

use crate::error::EmergencyError;
use crate::models::{EmergencyRequest, EmergencyStatus, NewEmergencyRequest};
use crate::services::store::{EmergencyRequestStore, SupabaseEmergencyRequestStore};

pub struct EmergencyRequestService {
    store: Arc<dyn EmergencyRequestStore>,
}

impl EmergencyRequestService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_store(Arc::new(
            SupabaseEmergencyRequestStore::new(config).with_auth_token(auth_token),
        ))
    }

    pub fn with_store(store: Arc<dyn EmergencyRequestStore>) -> Self {
        Self { store }
    }

    /// Record a new request in `pending`.
    pub async fn create(&self, new_request: NewEmergencyRequest) -> Result<EmergencyRequest, EmergencyError> {
        let symptom = new_request.symptom.trim();
        if symptom.is_empty() {
            return Err(EmergencyError::ValidationError("symptom must not be empty".to_string()));
        }

        let location = Coordinates::new(new_request.patient_latitude, new_request.patient_longitude);
        if !location.is_valid() {
            return Err(EmergencyError::ValidationError(format!(
                "coordinates ({}, {}) are out of range",
                new_request.patient_latitude, new_request.patient_longitude
            )));
        }

        let now = Utc::now();
        let request = EmergencyRequest {
            id: Uuid::new_v4(),
            patient_id: new_request.patient_id,
            doctor_id: new_request.doctor_id,
            symptom: symptom.to_string(),
            patient_latitude: location.latitude,
            patient_longitude: location.longitude,
            status: EmergencyStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(&request).await?;

        info!(
            "Emergency request {} created by patient {} for doctor {}",
            stored.id, stored.patient_id, stored.doctor_id
        );
        Ok(stored)
    }

    pub async fn get(&self, id: Uuid) -> Result<EmergencyRequest, EmergencyError> {
        self.store.get(id).await?.ok_or(EmergencyError::NotFound(id))
    }

    pub async fn accept(&self, id: Uuid) -> Result<EmergencyRequest, EmergencyError> {
        self.transition(id, EmergencyStatus::Accepted).await
    }

    pub async fn decline(&self, id: Uuid) -> Result<EmergencyRequest, EmergencyError> {
        self.transition(id, EmergencyStatus::Declined).await
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: Option<EmergencyStatus>,
    ) -> Result<Vec<EmergencyRequest>, EmergencyError> {
        self.store.list_for_doctor(doctor_id, status).await
    }

    async fn transition(&self, id: Uuid, to: EmergencyStatus) -> Result<EmergencyRequest, EmergencyError> {
        if let Some(updated) = self.store.transition_from_pending(id, to, Utc::now()).await? {
            info!("Emergency request {} is now {}", id, to);
            return Ok(updated);
        }

        // The conditional write matched nothing: no such id, no longer pending, or write refused.
        let current = self.store.get(id).await?.ok_or(EmergencyError::NotFound(id))?;
        if current.status == EmergencyStatus::Pending {
            warn!("Store refused to move pending emergency request {} to {}", id, to);
            return Err(EmergencyError::UpdateRefused(id));
        }
        warn!("Rejected transition of emergency request {} from {} to {}", id, current.status, to);

        Err(EmergencyError::InvalidTransition {
            from: current.status,
            to,
        })
    }
}
