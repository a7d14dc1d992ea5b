// libs/doctor-cell/src/services/provider.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AvailabilityWindow, DoctorError, ProviderAvailability};
use crate::services::availability::AvailabilityEvaluator;

const WINDOW_SELECT: &str = "id,day_of_week,start_time,end_time,is_24_hours,is_available";

/// Reads and flips the doctor's own `is_available` switch on their windows.
pub struct ProviderAvailabilityService {
    supabase: SupabaseClient,
    evaluator: AvailabilityEvaluator,
}

impl ProviderAvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            evaluator: AvailabilityEvaluator::with_offset_minutes(config.availability_utc_offset_minutes),
        }
    }

    pub async fn status_at(
        &self,
        doctor_id: Uuid,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<ProviderAvailability, DoctorError> {
        let path = format!(
            "/rest/v1/doctor_availability?doctor_id=eq.{}&select={}",
            doctor_id, WINDOW_SELECT
        );
        debug!("Fetching availability windows for doctor {}", doctor_id);

        let windows: Vec<AvailabilityWindow> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| {
            error!("Failed to fetch availability for doctor {}: {}", doctor_id, e);
            DoctorError::StorageUnavailable(e.to_string())
        })?;

        Ok(self.summarize(doctor_id, windows, now))
    }

    /// Enable or disable every window of the doctor.
    pub async fn set_available_at(
        &self,
        doctor_id: Uuid,
        available: bool,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<ProviderAvailability, DoctorError> {
        let path = format!(
            "/rest/v1/doctor_availability?doctor_id=eq.{}&select={}",
            doctor_id, WINDOW_SELECT
        );

        let windows: Vec<AvailabilityWindow> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({
                "is_available": available,
                "updated_at": now,
            })),
            Some(SupabaseClient::return_representation()),
        ).await.map_err(|e| {
            error!("Failed to update availability for doctor {}: {}", doctor_id, e);
            DoctorError::StorageUnavailable(e.to_string())
        })?;

        if windows.is_empty() {
            return Err(DoctorError::NotFound(format!(
                "no availability windows for doctor {}",
                doctor_id
            )));
        }

        info!(
            "Doctor {} set available={} on {} windows",
            doctor_id, available, windows.len()
        );
        Ok(self.summarize(doctor_id, windows, now))
    }

    fn summarize(
        &self,
        doctor_id: Uuid,
        windows: Vec<AvailabilityWindow>,
        now: DateTime<Utc>,
    ) -> ProviderAvailability {
        ProviderAvailability {
            doctor_id,
            available_now: windows.iter().any(|w| w.is_available),
            open_now: self.evaluator.any_open(&windows, now),
            windows,
        }
    }
}
