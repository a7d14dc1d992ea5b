use std::collections::BTreeSet;

use tracing::debug;

pub const GENERAL_PRACTITIONER: &str = "General Practitioner";
pub const EMERGENCY_MEDICINE: &str = "Emergency Medicine";
pub const INTERNAL_MEDICINE: &str = "Internal Medicine";

/// Returned when no keyword matches.
pub const FALLBACK_SPECIALTIES: [&str; 3] = [GENERAL_PRACTITIONER, EMERGENCY_MEDICINE, INTERNAL_MEDICINE];

/// Keyword phrases (lowercase) and the specialties they point at, scanned in order.
pub static SYMPTOM_SPECIALTIES: &[(&str, &[&str])] = &[
    // Cardiovascular
    ("chest pain", &["Cardiologist", EMERGENCY_MEDICINE, GENERAL_PRACTITIONER]),
    ("heart", &["Cardiologist", EMERGENCY_MEDICINE]),
    ("palpitations", &["Cardiologist", INTERNAL_MEDICINE]),
    // Neurological
    ("headache", &["Neurosurgeon", GENERAL_PRACTITIONER, INTERNAL_MEDICINE]),
    ("migraine", &["Neurosurgeon", GENERAL_PRACTITIONER]),
    ("dizziness", &["Neurosurgeon", GENERAL_PRACTITIONER, INTERNAL_MEDICINE]),
    ("seizure", &["Neurosurgeon", EMERGENCY_MEDICINE]),
    // Respiratory
    ("breathing", &["Pulmonologist", EMERGENCY_MEDICINE, GENERAL_PRACTITIONER]),
    ("cough", &["Pulmonologist", GENERAL_PRACTITIONER, INTERNAL_MEDICINE]),
    ("asthma", &["Pulmonologist", EMERGENCY_MEDICINE]),
    ("shortness of breath", &["Pulmonologist", EMERGENCY_MEDICINE, "Cardiologist"]),
    // Gastrointestinal
    ("stomach", &["Gastroenterologist", GENERAL_PRACTITIONER, INTERNAL_MEDICINE]),
    ("abdominal pain", &["Gastroenterologist", EMERGENCY_MEDICINE, GENERAL_PRACTITIONER]),
    ("nausea", &["Gastroenterologist", GENERAL_PRACTITIONER]),
    ("vomiting", &["Gastroenterologist", EMERGENCY_MEDICINE, GENERAL_PRACTITIONER]),
    // General / emergency
    ("fever", &[GENERAL_PRACTITIONER, INTERNAL_MEDICINE, EMERGENCY_MEDICINE]),
    ("pain", &[GENERAL_PRACTITIONER, EMERGENCY_MEDICINE]),
    ("injury", &["Orthopedic Surgeon", EMERGENCY_MEDICINE]),
    ("bleeding", &[EMERGENCY_MEDICINE, GENERAL_PRACTITIONER]),
    ("accident", &[EMERGENCY_MEDICINE, "Orthopedic Surgeon"]),
    // Pediatric
    ("child", &["Pediatrician", GENERAL_PRACTITIONER]),
    ("baby", &["Pediatrician"]),
    // Orthopedic
    ("bone", &["Orthopedic Surgeon", EMERGENCY_MEDICINE]),
    ("fracture", &["Orthopedic Surgeon", EMERGENCY_MEDICINE]),
    ("joint", &["Orthopedic Surgeon", "Rheumatologist"]),
    ("back pain", &["Orthopedic Surgeon", GENERAL_PRACTITIONER]),
    // Dermatological
    ("skin", &["Dermatologist", GENERAL_PRACTITIONER]),
    ("rash", &["Dermatologist", GENERAL_PRACTITIONER]),
    // Gynecological
    ("pregnancy", &["Gynecologist", "Obstetrician"]),
    ("menstrual", &["Gynecologist", GENERAL_PRACTITIONER]),
    // Urological
    ("urinary", &["Urologist", GENERAL_PRACTITIONER]),
    ("kidney", &["Urologist", "Nephrologist", INTERNAL_MEDICINE]),
    // Ophthalmological
    ("eye", &["Ophthalmologist", GENERAL_PRACTITIONER]),
    ("vision", &["Ophthalmologist"]),
    // ENT
    ("ear", &["ENT Specialist", GENERAL_PRACTITIONER]),
    ("throat", &["ENT Specialist", GENERAL_PRACTITIONER]),
    ("nose", &["ENT Specialist", GENERAL_PRACTITIONER]),
];

/// Maps free-text symptoms to candidate specialties.
///
/// Matching is a case-insensitive substring scan, so it deliberately over-matches
/// ("heart" also hits "heartburn", "ear" hits "year").
pub struct SpecialtyClassifier;

impl SpecialtyClassifier {
    pub fn classify(symptom: &str) -> BTreeSet<&'static str> {
        let symptom_lower = symptom.to_lowercase();

        let mut specialties: BTreeSet<&'static str> = SYMPTOM_SPECIALTIES
            .iter()
            .filter(|(keyword, _)| symptom_lower.contains(keyword))
            .flat_map(|(_, specialties)| specialties.iter().copied())
            .collect();

        if specialties.is_empty() {
            debug!("No keyword matched symptom, falling back to generalists");
            specialties.extend(FALLBACK_SPECIALTIES);
        }

        specialties
    }

    pub fn classify_owned(symptom: &str) -> Vec<String> {
        Self::classify(symptom).into_iter().map(String::from).collect()
    }
}
