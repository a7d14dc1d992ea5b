pub mod availability;
pub mod classifier;
pub mod directory;
pub mod geo;
pub mod matching;
pub mod provider;

pub use availability::AvailabilityEvaluator;
pub use classifier::SpecialtyClassifier;
pub use directory::{DoctorDirectory, SupabaseDoctorDirectory};
pub use geo::{distance_km, Coordinates};
pub use matching::DoctorMatchingService;
pub use provider::ProviderAvailabilityService;
