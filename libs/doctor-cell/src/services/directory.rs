use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{DirectoryEntry, DoctorError};

const DIRECTORY_SELECT: &str = "id,day_of_week,start_time,end_time,is_24_hours,is_available,\
doctor:doctors!inner(id,full_name,specialty,sub_specialty,phone,email),\
location:doctor_service_locations!inner(id,location_type,name,address,city,latitude,longitude)";

/// Read access to doctors, their service locations and availability windows.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// All (doctor, location, window) rows whose doctor has one of `specialties`
    /// and whose location has coordinates.
    async fn find_candidates(&self, specialties: Vec<String>) -> Result<Vec<DirectoryEntry>, DoctorError>;
}

pub struct SupabaseDoctorDirectory {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseDoctorDirectory {
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

    pub(crate) fn candidates_path(specialties: &[String]) -> String {
        let specialty_list = specialties
            .iter()
            .map(|s| urlencoding::encode(&format!("\"{}\"", s.replace('"', ""))).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "/rest/v1/doctor_availability?select={}&is_available=eq.true&doctor.specialty=in.({})&location.latitude=not.is.null&location.longitude=not.is.null",
            urlencoding::encode(DIRECTORY_SELECT),
            specialty_list,
        )
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseDoctorDirectory {
    async fn find_candidates(&self, specialties: Vec<String>) -> Result<Vec<DirectoryEntry>, DoctorError> {
        if specialties.is_empty() {
            return Ok(Vec::new());
        }

        let path = Self::candidates_path(&specialties);
        debug!("Querying doctor directory for {} specialties", specialties.len());

        let entries: Vec<DirectoryEntry> = self.supabase.request(
            Method::GET,
            &path,
            self.auth_token.as_deref(),
            None,
        ).await.map_err(|e| {
            error!("Doctor directory query failed: {}", e);
            DoctorError::StorageUnavailable(e.to_string())
        })?;

        debug!("Doctor directory returned {} rows", entries.len());
        Ok(entries)
    }
}
