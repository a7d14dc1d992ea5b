pub mod store;
pub mod tracker;

pub use store::{EmergencyRequestStore, SupabaseEmergencyRequestStore};
pub use tracker::EmergencyRequestService;
