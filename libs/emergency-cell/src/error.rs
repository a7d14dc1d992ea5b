use thiserror::Error;
use uuid::Uuid;

use crate::models::EmergencyStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmergencyError {
    #[error("Emergency request not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: EmergencyStatus, to: EmergencyStatus },

    /// The row is still pending but the store would not write it (row-level security).
    #[error("Update of emergency request {0} was refused")]
    UpdateRefused(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}
