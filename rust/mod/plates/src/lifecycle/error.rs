use chrono::{DateTime, Utc};
use platetrack_core::ServiceError;

use crate::inventory::format_number;
use crate::model::PlateStatus;

/// Why a lifecycle operation was rejected. Nothing is mutated when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("number {number:05} does not belong to any equipment range")]
    Unclassified { number: u32 },

    #[error("number {number:05} is already registered ({count} number(s) in the batch already exist)")]
    Collision { number: u32, count: usize },

    #[error("{}", illegal_transition(.number, .status))]
    IllegalTransition { number: u32, status: Option<PlateStatus> },

    #[error("plate {number:05} is in quarantine until {}", .release_date.format("%Y-%m-%d"))]
    Quarantined { number: u32, release_date: DateTime<Utc> },

    #[error("numbers {start:05} and {end:05} belong to different equipment types")]
    RangeMismatch { start: u32, end: u32 },

    #[error("invalid batch {start}-{end}")]
    InvalidBatch { start: u32, end: u32 },

    #[error("batch of {len} numbers exceeds the limit of {max}")]
    BatchTooLarge { len: u64, max: u32 },

    #[error("unknown equipment '{name}'")]
    UnknownEquipment { name: String },

    #[error("plate {number:05} needs a destination to be distributed")]
    MissingDestination { number: u32 },

    #[error("plate {number:05} not found")]
    NotFound { number: u32 },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

fn illegal_transition(number: &u32, status: &Option<PlateStatus>) -> String {
    match status {
        None => format!("plate {} is not registered", format_number(*number)),
        Some(s) => format!("plate {} cannot move from {}", format_number(*number), s),
    }
}

impl LifecycleError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unclassified { .. } => "UNCLASSIFIED",
            Self::Collision { .. } => "COLLISION",
            Self::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Self::Quarantined { .. } => "QUARANTINED",
            Self::RangeMismatch { .. } => "RANGE_MISMATCH",
            Self::InvalidBatch { .. } => "INVALID_BATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::UnknownEquipment { .. } => "UNKNOWN_EQUIPMENT",
            Self::MissingDestination { .. } => "MISSING_DESTINATION",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
        }
    }
}

impl From<LifecycleError> for ServiceError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Collision { .. } => ServiceError::Conflict(e.to_string()),
            LifecycleError::NotFound { .. } => ServiceError::NotFound(e.to_string()),
            _ => ServiceError::Validation(e.to_string()),
        }
    }
}
