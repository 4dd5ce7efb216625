use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Front-ends match on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type returned by the application service.
///
/// Every engine error converts into one of these variants. The variant
/// decides the stable code (see [`error_code`]); the message carries the
/// offending value and context, e.g. `plate 00104 already exists`.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Plate, rule or record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key, e.g. intake of a number that is already registered.
    #[error("{0}")]
    Conflict(String),

    /// Input or state does not allow the requested operation.
    #[error("{0}")]
    Validation(String),

    /// Admin secret missing or wrong.
    #[error("{0}")]
    PermissionDenied(String),

    /// Attempted write to read-only data (file-layer catalog).
    #[error("{0}")]
    ReadOnly(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ServiceError::ReadOnly(_) => error_code::READ_ONLY,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }
}
