// libs/doctor-cell/tests/matching_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use mockall::mock;
use uuid::Uuid;

use doctor_cell::models::*;
use doctor_cell::services::{DoctorDirectory, DoctorMatchingService};
use shared_utils::test_utils::TestConfig;

const PATIENT_LAT: f64 = -0.1956;
const PATIENT_LON: f64 = -78.4867;

mock! {
    pub Directory {}

    #[async_trait]
    impl DoctorDirectory for Directory {
        async fn find_candidates(&self, specialties: Vec<String>) -> Result<Vec<DirectoryEntry>, DoctorError>;
    }
}

/// In-memory directory that filters by specialty like the real query does.
struct FixtureDirectory {
    entries: Vec<DirectoryEntry>,
}

#[async_trait]
impl DoctorDirectory for FixtureDirectory {
    async fn find_candidates(&self, specialties: Vec<String>) -> Result<Vec<DirectoryEntry>, DoctorError> {
        Ok(self.entries
            .iter()
            .filter(|e| specialties.contains(&e.doctor.specialty))
            .filter(|e| e.location.coordinates().is_some())
            .cloned()
            .collect())
    }
}

// 2025-12-10 is a Wednesday.
fn wednesday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap()
}

fn doctor(name: &str, specialty: &str) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        specialty: specialty.to_string(),
        sub_specialty: None,
        phone: Some("+593987654321".to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
    }
}

fn location(lat: f64, lon: f64) -> ServiceLocation {
    ServiceLocation {
        id: Uuid::new_v4(),
        location_type: "clinic".to_string(),
        name: "Clinica Pichincha".to_string(),
        address: Some("Av. Amazonas N24-03".to_string()),
        city: Some("Quito".to_string()),
        latitude: Some(lat),
        longitude: Some(lon),
    }
}

fn always_open() -> AvailabilityWindow {
    AvailabilityWindow {
        id: Uuid::new_v4(),
        is_24_hours: true,
        day_of_week: None,
        start_time: None,
        end_time: None,
        is_available: true,
    }
}

fn weekly(day: i32, start: u32, end: u32) -> AvailabilityWindow {
    AvailabilityWindow {
        id: Uuid::new_v4(),
        is_24_hours: false,
        day_of_week: Some(day),
        start_time: NaiveTime::from_hms_opt(start, 0, 0),
        end_time: NaiveTime::from_hms_opt(end, 0, 0),
        is_available: true,
    }
}

fn entry(doctor: &Doctor, location: &ServiceLocation, window: AvailabilityWindow) -> DirectoryEntry {
    DirectoryEntry {
        doctor: doctor.clone(),
        location: location.clone(),
        window,
    }
}

fn service_with(entries: Vec<DirectoryEntry>) -> DoctorMatchingService {
    let config = TestConfig::default().to_app_config();
    DoctorMatchingService::with_directory(&config, Arc::new(FixtureDirectory { entries }))
}

fn search_request(symptom: &str, radius_km: Option<f64>, limit: Option<usize>) -> DoctorSearchRequest {
    DoctorSearchRequest {
        symptom: symptom.to_string(),
        latitude: PATIENT_LAT,
        longitude: PATIENT_LON,
        radius_km,
        limit,
    }
}

#[tokio::test]
async fn chest_pain_returns_only_the_cardiologist() {
    let cardiologist = doctor("Dr. Andrea Vela", "Cardiologist");
    let dermatologist = doctor("Dr. Luis Paredes", "Dermatologist");

    // ~2.00 km and ~1.00 km due north of the patient
    let service = service_with(vec![
        entry(&cardiologist, &location(-0.1776, PATIENT_LON), always_open()),
        entry(&dermatologist, &location(-0.1866, PATIENT_LON), always_open()),
    ]);

    let results = service
        .search_at(&search_request("severe chest pain", Some(50.0), None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doctor_id, cardiologist.id);
    assert_eq!(results[0].specialty, "Cardiologist");
    assert_eq!(results[0].distance_km, 2.0);
    assert!(results[0].is_available);
    assert!(results[0].is_24_hours);
}

#[tokio::test]
async fn results_respect_radius_order_and_limit() {
    let mut entries = Vec::new();
    // 0.5, 1.5, 2.5, 3.5 ... km north of the patient, inserted far-to-near
    for step in (0..8).rev() {
        let offset_deg = (0.5 + step as f64) / 111.19;
        let gp = doctor(&format!("Dr. GP {}", step), "General Practitioner");
        entries.push(entry(&gp, &location(PATIENT_LAT + offset_deg, PATIENT_LON), always_open()));
    }
    let service = service_with(entries);

    let within_radius = service
        .search_at(&search_request("fever", Some(3.0), None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(within_radius.len(), 3);
    assert!(within_radius.iter().all(|c| c.distance_km <= 3.0));
    assert!(within_radius.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));

    let limited = service
        .search_at(&search_request("fever", Some(50.0), Some(2)), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].distance_km, 0.5);
    assert_eq!(limited[1].distance_km, 1.5);
}

#[tokio::test]
async fn remote_patient_gets_empty_list() {
    let service = service_with(vec![
        entry(&doctor("Dr. Quito", "Cardiologist"), &location(-0.1776, PATIENT_LON), always_open()),
    ]);

    let mut request = search_request("chest pain", Some(50.0), None);
    // Galapagos
    request.latitude = -0.7432;
    request.longitude = -90.3168;

    let results = service.search_at(&request, wednesday_noon()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn closed_windows_are_excluded() {
    let open_gp = doctor("Dr. Open", "General Practitioner");
    let closed_gp = doctor("Dr. Closed", "General Practitioner");
    let paused_gp = doctor("Dr. Paused", "General Practitioner");

    let mut paused = always_open();
    paused.is_available = false;

    let service = service_with(vec![
        entry(&open_gp, &location(-0.19, PATIENT_LON), weekly(3, 8, 18)),
        // Thursday only
        entry(&closed_gp, &location(-0.19, PATIENT_LON), weekly(4, 8, 18)),
        entry(&paused_gp, &location(-0.19, PATIENT_LON), paused),
    ]);

    let results = service
        .search_at(&search_request("fever", None, None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doctor_id, open_gp.id);
    assert!(!results[0].is_24_hours);
}

#[tokio::test]
async fn windows_of_one_location_collapse_into_one_candidate() {
    let gp = doctor("Dr. Busy", "General Practitioner");
    let clinic = location(-0.19, PATIENT_LON);

    let service = service_with(vec![
        entry(&gp, &clinic, weekly(3, 8, 11)),
        entry(&gp, &clinic, weekly(3, 11, 14)),
        entry(&gp, &clinic, always_open()),
        entry(&gp, &clinic, weekly(5, 8, 18)),
    ]);

    let results = service
        .search_at(&search_request("fever", None, None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].location_id, clinic.id);
    assert!(results[0].is_24_hours);
}

#[tokio::test]
async fn same_doctor_at_two_locations_yields_two_candidates() {
    let gp = doctor("Dr. Twice", "General Practitioner");
    let near = location(-0.19, PATIENT_LON);
    let far = location(-0.15, PATIENT_LON);

    let service = service_with(vec![
        entry(&gp, &far, always_open()),
        entry(&gp, &near, always_open()),
    ]);

    let results = service
        .search_at(&search_request("fever", None, None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].location_id, near.id);
    assert_eq!(results[1].location_id, far.id);
}

#[tokio::test]
async fn equal_distances_are_ordered_by_doctor_id() {
    let clinic = location(-0.19, PATIENT_LON);
    let doctors: Vec<Doctor> = (0..5)
        .map(|i| doctor(&format!("Dr. Shared {}", i), "Emergency Medicine"))
        .collect();

    let entries = doctors.iter().map(|d| entry(d, &clinic, always_open())).collect();
    let service = service_with(entries);

    let first = service
        .search_at(&search_request("accident", None, None), wednesday_noon())
        .await
        .unwrap();
    let second = service
        .search_at(&search_request("accident", None, None), wednesday_noon())
        .await
        .unwrap();

    let mut expected: Vec<Uuid> = doctors.iter().map(|d| d.id).collect();
    expected.sort();

    let ids: Vec<Uuid> = first.iter().map(|c| c.doctor_id).collect();
    assert_eq!(ids, expected);
    assert_eq!(first, second);
}

#[tokio::test]
async fn location_without_coordinates_is_skipped() {
    let gp = doctor("Dr. Nowhere", "General Practitioner");
    let mut unknown = location(0.0, 0.0);
    unknown.latitude = None;

    let service = service_with(vec![entry(&gp, &unknown, always_open())]);

    let results = service
        .search_at(&search_request("fever", None, None), wednesday_noon())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn invalid_query_is_rejected_before_storage() {
    let mut directory = MockDirectory::new();
    directory.expect_find_candidates().times(0);

    let config = TestConfig::default().to_app_config();
    let service = DoctorMatchingService::with_directory(&config, Arc::new(directory));

    let mut request = search_request("fever", None, None);
    request.latitude = 91.0;
    assert_matches!(
        service.search_at(&request, wednesday_noon()).await,
        Err(DoctorError::InvalidQuery(_))
    );

    let request = search_request("fever", Some(-1.0), None);
    assert_matches!(
        service.search_at(&request, wednesday_noon()).await,
        Err(DoctorError::InvalidQuery(_))
    );
}

#[tokio::test]
async fn directory_receives_classified_specialties() {
    let mut directory = MockDirectory::new();
    directory
        .expect_find_candidates()
        .withf(|specialties: &Vec<String>| {
            specialties.contains(&"Cardiologist".to_string())
                && !specialties.contains(&"Dermatologist".to_string())
        })
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let config = TestConfig::default().to_app_config();
    let service = DoctorMatchingService::with_directory(&config, Arc::new(directory));

    let results = service
        .search_at(&search_request("chest pain", None, None), wednesday_noon())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn storage_failure_propagates() {
    let mut directory = MockDirectory::new();
    directory
        .expect_find_candidates()
        .returning(|_| Err(DoctorError::StorageUnavailable("connection refused".to_string())));

    let config = TestConfig::default().to_app_config();
    let service = DoctorMatchingService::with_directory(&config, Arc::new(directory));

    assert_matches!(
        service.search_at(&search_request("fever", None, None), wednesday_noon()).await,
        Err(DoctorError::StorageUnavailable(msg)) if msg == "connection refused"
    );
}

#[tokio::test]
async fn limit_is_capped_by_configuration() {
    let clinic = location(-0.19, PATIENT_LON);
    let entries = (0..150)
        .map(|i| entry(&doctor(&format!("Dr. {}", i), "Internal Medicine"), &clinic, always_open()))
        .collect();
    let service = service_with(entries);

    let results = service
        .search_at(&search_request("palpitations", None, Some(10_000)), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 100);
}

#[tokio::test]
async fn candidate_exactly_at_the_radius_is_kept() {
    let at_edge = doctor("Dr. Edge", "Cardiologist");
    let beyond = doctor("Dr. Beyond", "Cardiologist");

    let service = service_with(vec![
        // rounds to 2.00 km
        entry(&at_edge, &location(-0.1776, PATIENT_LON), always_open()),
        // rounds to 2.01 km
        entry(&beyond, &location(-0.1775, PATIENT_LON), always_open()),
    ]);

    let results = service
        .search_at(&search_request("chest pain", Some(2.0), None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doctor_id, at_edge.id);
    assert_eq!(results[0].distance_km, 2.0);
}

#[tokio::test]
async fn search_results_carry_the_classified_specialties() {
    let service = service_with(vec![
        entry(&doctor("Dr. Lung", "Pulmonologist"), &location(-0.19, PATIENT_LON), always_open()),
    ]);

    let results = service
        .search_results_at(&search_request("persistent cough", None, None), wednesday_noon())
        .await
        .unwrap();

    assert_eq!(
        results.specialties,
        vec!["General Practitioner", "Internal Medicine", "Pulmonologist"]
    );
    assert_eq!(results.doctors.len(), 1);
}
