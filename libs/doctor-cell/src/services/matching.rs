// libs/doctor-cell/src/services/matching.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{DirectoryEntry, DoctorError, DoctorSearchRequest, DoctorSearchResults, MatchCandidate};
use crate::services::availability::{is_available, AvailabilityEvaluator};
use crate::services::classifier::SpecialtyClassifier;
use crate::services::directory::{DoctorDirectory, SupabaseDoctorDirectory};
use crate::services::geo::{distance_km, Coordinates};

pub struct DoctorMatchingService {
    directory: Arc<dyn DoctorDirectory>,
    evaluator: AvailabilityEvaluator,
    default_radius_km: f64,
    default_limit: usize,
    max_limit: usize,
}

impl DoctorMatchingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_directory(config, Arc::new(SupabaseDoctorDirectory::new(config)))
    }

    pub fn with_directory(config: &AppConfig, directory: Arc<dyn DoctorDirectory>) -> Self {
        Self {
            directory,
            evaluator: AvailabilityEvaluator::with_offset_minutes(config.availability_utc_offset_minutes),
            default_radius_km: config.search_default_radius_km,
            default_limit: config.search_default_limit,
            max_limit: config.search_max_limit.max(1),
        }
    }

    /// Specialties the classifier associates with a symptom.
    pub fn specialties_for(&self, symptom: &str) -> Vec<String> {
        SpecialtyClassifier::classify_owned(symptom)
    }

    /// Nearest available doctors for a symptom, as of now.
    pub async fn search(&self, request: &DoctorSearchRequest) -> Result<Vec<MatchCandidate>, DoctorError> {
        self.search_at(request, Utc::now()).await
    }

    /// Nearest available doctors for a symptom, evaluating availability at `now`.
    ///
    /// Candidates are open at `now`, within the radius, sorted nearest first
    /// (ties by doctor id, then location id) and cut to the limit. No match is an
    /// empty list.
    pub async fn search_at(
        &self,
        request: &DoctorSearchRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<MatchCandidate>, DoctorError> {
        self.search_results_at(request, now).await.map(|results| results.doctors)
    }

    /// Like [`Self::search`], also returning the specialties used for the lookup.
    pub async fn search_results(&self, request: &DoctorSearchRequest) -> Result<DoctorSearchResults, DoctorError> {
        self.search_results_at(request, Utc::now()).await
    }

    pub async fn search_results_at(
        &self,
        request: &DoctorSearchRequest,
        now: DateTime<Utc>,
    ) -> Result<DoctorSearchResults, DoctorError> {
        let patient = Coordinates::new(request.latitude, request.longitude);
        if !patient.is_valid() {
            return Err(DoctorError::InvalidQuery(format!(
                "coordinates ({}, {}) are out of range",
                request.latitude, request.longitude
            )));
        }

        let radius_km = request.radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(DoctorError::InvalidQuery(format!("radius_km must be a non-negative number, got {}", radius_km)));
        }

        let limit = request.limit.unwrap_or(self.default_limit).min(self.max_limit);

        let specialties = self.specialties_for(&request.symptom);
        debug!("Symptom mapped to specialties: {:?}", specialties);

        let entries = self.directory.find_candidates(specialties.clone()).await?;
        debug!("Evaluating {} directory rows", entries.len());

        let mut candidates = self.rank(entries, &specialties, patient, radius_km, now);
        candidates.truncate(limit);

        info!(
            "Doctor search returned {} candidates within {} km (limit {})",
            candidates.len(), radius_km, limit
        );

        Ok(DoctorSearchResults {
            specialties,
            doctors: candidates,
        })
    }

    fn rank(
        &self,
        entries: Vec<DirectoryEntry>,
        specialties: &[String],
        patient: Coordinates,
        radius_km: f64,
        now: DateTime<Utc>,
    ) -> Vec<MatchCandidate> {
        // One candidate per (doctor, location), however many windows it has.
        let mut grouped: BTreeMap<(Uuid, Uuid), Vec<DirectoryEntry>> = BTreeMap::new();
        for entry in entries {
            if !specialties.iter().any(|s| *s == entry.doctor.specialty) {
                continue;
            }
            grouped.entry((entry.doctor.id, entry.location.id)).or_default().push(entry);
        }

        let local_now = self.evaluator.local_time(now);

        let mut candidates: Vec<MatchCandidate> = grouped
            .into_values()
            .filter_map(|rows| {
                let open: Vec<&DirectoryEntry> = rows
                    .iter()
                    .filter(|row| is_available(&row.window, local_now))
                    .collect();
                let first = open.first()?;
                let coordinates = first.location.coordinates()?;

                let distance = distance_km(patient.latitude, patient.longitude, coordinates.0, coordinates.1);
                if distance > radius_km {
                    return None;
                }

                let is_24_hours = open.iter().any(|row| row.window.is_24_hours);
                Some(MatchCandidate::new(&first.doctor, &first.location, coordinates, distance, is_24_hours))
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.doctor_id.cmp(&b.doctor_id))
                .then_with(|| a.location_id.cmp(&b.location_id))
        });

        candidates
    }
}
