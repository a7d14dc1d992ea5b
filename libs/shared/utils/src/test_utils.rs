use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            search_default_radius_km: shared_config::DEFAULT_SEARCH_RADIUS_KM,
            search_default_limit: shared_config::DEFAULT_SEARCH_LIMIT,
            search_max_limit: shared_config::DEFAULT_SEARCH_MAX_LIMIT,
            availability_utc_offset_minutes: 0,
            server_port: shared_config::DEFAULT_SERVER_PORT,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", "patient")
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn with_id(id: Uuid, email: &str, role: &str) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn uuid(&self) -> Uuid {
        Uuid::parse_str(&self.id).expect("test users always carry uuid ids")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn bearer(user: &TestUser) -> String {
        format!("Bearer {}", Self::create_test_token(user, TEST_JWT_SECRET, Some(1)))
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Row shapes as PostgREST returns them for the doctor and emergency tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// One `doctor_availability` row with its embedded doctor and location.
    pub fn directory_row(
        doctor_id: Uuid,
        full_name: &str,
        specialty: &str,
        latitude: f64,
        longitude: f64,
        is_24_hours: bool,
    ) -> Value {
        let (day_of_week, start_time, end_time) = if is_24_hours {
            (Value::Null, Value::Null, Value::Null)
        } else {
            (json!(1), json!("08:00:00"), json!("18:00:00"))
        };

        json!({
            "id": Uuid::new_v4(),
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time,
            "is_24_hours": is_24_hours,
            "is_available": true,
            "doctor": {
                "id": doctor_id,
                "full_name": full_name,
                "specialty": specialty,
                "sub_specialty": null,
                "phone": "+593987654321",
                "email": "doctor@example.com"
            },
            "location": {
                "id": Uuid::new_v4(),
                "location_type": "clinic",
                "name": format!("{} Clinic", full_name),
                "address": "Av. Amazonas N24-03",
                "city": "Quito",
                "latitude": latitude,
                "longitude": longitude
            }
        })
    }

    pub fn emergency_request_row(
        request_id: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
        status: &str,
    ) -> Value {
        json!({
            "id": request_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "symptom": "severe chest pain",
            "patient_latitude": -0.1956,
            "patient_longitude": -78.4867,
            "status": status,
            "created_at": "2025-12-10T14:00:00Z",
            "updated_at": "2025-12-10T14:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
