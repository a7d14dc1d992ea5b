use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// EMERGENCY REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyStatus {
    Pending,
    Accepted,
    Declined,
}

impl EmergencyStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmergencyStatus::Accepted | EmergencyStatus::Declined)
    }

    pub fn can_transition_to(&self, target: &EmergencyStatus) -> bool {
        use EmergencyStatus::*;
        matches!((self, target), (Pending, Accepted) | (Pending, Declined))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyStatus::Pending => "pending",
            EmergencyStatus::Accepted => "accepted",
            EmergencyStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for EmergencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmergencyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(EmergencyStatus::Pending),
            "accepted" => Ok(EmergencyStatus::Accepted),
            "declined" => Ok(EmergencyStatus::Declined),
            other => Err(format!("unknown emergency status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub symptom: String,
    pub patient_latitude: f64,
    pub patient_longitude: f64,
    pub status: EmergencyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmergencyRequest {
    /// Patient or target doctor.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.patient_id == user_id || self.doctor_id == user_id
    }
}

/// Body of `POST /emergency/requests`. The patient is the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmergencyRequest {
    pub doctor_id: Uuid,
    pub symptom: String,
    pub patient_latitude: f64,
    pub patient_longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmergencyRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub symptom: String,
    pub patient_latitude: f64,
    pub patient_longitude: f64,
}

impl NewEmergencyRequest {
    pub fn from_body(patient_id: Uuid, body: CreateEmergencyRequest) -> Self {
        Self {
            patient_id,
            doctor_id: body.doctor_id,
            symptom: body.symptom,
            patient_latitude: body.patient_latitude,
            patient_longitude: body.patient_longitude,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmergencyListQuery {
    pub status: Option<EmergencyStatus>,
}
