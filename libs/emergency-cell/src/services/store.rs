// libs/emergency-cell/src/services/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::EmergencyError;
use crate::models::{EmergencyRequest, EmergencyStatus};

const TABLE_PATH: &str = "/rest/v1/emergency_requests";

/// Persistence for emergency requests.
///
/// `transition_from_pending` must be a single conditional write: it only
/// succeeds while the stored status is still `pending`, and returns `None`
/// otherwise (including when the id does not exist).
#[async_trait]
pub trait EmergencyRequestStore: Send + Sync {
    async fn insert(&self, request: &EmergencyRequest) -> Result<EmergencyRequest, EmergencyError>;

    async fn get(&self, id: Uuid) -> Result<Option<EmergencyRequest>, EmergencyError>;

    async fn transition_from_pending(
        &self,
        id: Uuid,
        to: EmergencyStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<EmergencyRequest>, EmergencyError>;

    /// Newest first.
    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: Option<EmergencyStatus>,
    ) -> Result<Vec<EmergencyRequest>, EmergencyError>;
}

pub struct SupabaseEmergencyRequestStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseEmergencyRequestStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn storage_error(context: &str, e: impl std::fmt::Display) -> EmergencyError {
        error!("{}: {}", context, e);
        EmergencyError::StorageUnavailable(e.to_string())
    }
}

#[async_trait]
impl EmergencyRequestStore for SupabaseEmergencyRequestStore {
    async fn insert(&self, request: &EmergencyRequest) -> Result<EmergencyRequest, EmergencyError> {
        let body = serde_json::to_value(request)
            .map_err(|e| Self::storage_error("Failed to serialize emergency request", e))?;

        let rows: Vec<EmergencyRequest> = self.supabase.request_with_headers(
            Method::POST,
            TABLE_PATH,
            self.auth_token.as_deref(),
            Some(body),
            Some(SupabaseClient::return_representation()),
        ).await.map_err(|e| Self::storage_error("Failed to insert emergency request", e))?;

        rows.into_iter().next().ok_or_else(|| {
            EmergencyError::StorageUnavailable("insert returned no rows".to_string())
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<EmergencyRequest>, EmergencyError> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, id);

        let rows: Vec<EmergencyRequest> = self.supabase.request(
            Method::GET,
            &path,
            self.auth_token.as_deref(),
            None,
        ).await.map_err(|e| Self::storage_error("Failed to fetch emergency request", e))?;

        Ok(rows.into_iter().next())
    }

    async fn transition_from_pending(
        &self,
        id: Uuid,
        to: EmergencyStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<EmergencyRequest>, EmergencyError> {
        let path = format!("{}?id=eq.{}&status=eq.{}", TABLE_PATH, id, EmergencyStatus::Pending);
        debug!("Conditional update of emergency request {} to {}", id, to);

        let rows: Vec<EmergencyRequest> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            self.auth_token.as_deref(),
            Some(json!({
                "status": to,
                "updated_at": at,
            })),
            Some(SupabaseClient::return_representation()),
        ).await.map_err(|e| Self::storage_error("Failed to update emergency request", e))?;

        Ok(rows.into_iter().next())
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: Option<EmergencyStatus>,
    ) -> Result<Vec<EmergencyRequest>, EmergencyError> {
        let mut path = format!("{}?doctor_id=eq.{}", TABLE_PATH, doctor_id);
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        path.push_str("&order=created_at.desc");

        self.supabase.request(
            Method::GET,
            &path,
            self.auth_token.as_deref(),
            None,
        ).await.map_err(|e| Self::storage_error("Failed to list emergency requests", e))
    }
}
