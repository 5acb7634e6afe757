//! # API Error Type
//!
//! Unified error type for purchase-entry operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in GSTBook Entry                          │
//! │                                                                         │
//! │  Frontend                    Rust Session                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  session.submit()                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Already submitting? ─── ApiError::SUBMIT_IN_PROGRESS ─────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Draft invalid? ─── ValidationError ───────► ApiError ──────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Command layer failed? ─── BackendError ───► ApiError ──────────►│  │
//! │  │         │                                   (draft kept)         │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code = "VALIDATION_ERROR"                                       │
//! │    // e.message = "supplier is required"                                │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried automatically.

use serde::Serialize;
use thiserror::Error;

use gstbook_core::ValidationError;

// =============================================================================
// Backend Error
// =============================================================================

/// Failures reported by the command layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The command layer refused the request (constraint, bad payload).
    #[error("Rejected by command layer: {0}")]
    Rejected(String),

    /// The command layer could not be reached.
    #[error("Command layer unavailable: {0}")]
    Unavailable(String),

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading or validating [`crate::config::EntryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or malformed.
    #[error("Invalid entry configuration: {0}")]
    Invalid(String),

    /// The config file exists but could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

/// Result type alias for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned to the frontend.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "supplier is required"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced record not found
    NotFound,

    /// The draft is not ready to submit
    ValidationError,

    /// The command layer refused the request
    Rejected,

    /// The command layer could not be reached
    Unavailable,

    /// A submission is already in flight
    SubmitInProgress,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the error for a second submit while one is pending.
    pub fn submit_in_progress() -> Self {
        ApiError::new(
            ErrorCode::SubmitInProgress,
            "A submission is already in progress",
        )
    }
}

/// Result type alias for session operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts command-layer errors to API errors.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            BackendError::Rejected(reason) => ApiError::new(ErrorCode::Rejected, reason),
            BackendError::Unavailable(reason) => {
                tracing::error!("Command layer unavailable: {}", reason);
                ApiError::new(ErrorCode::Unavailable, "Could not reach the purchase store")
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_map_to_codes() {
        let err: ApiError = BackendError::Rejected("duplicate invoice".to_string()).into();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "duplicate invoice");

        let err: ApiError = BackendError::NotFound {
            entity: "Purchase".to_string(),
            id: "12".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Purchase not found: 12");

        let err: ApiError = BackendError::Unavailable("ipc closed".to_string()).into();
        assert_eq!(err.code, ErrorCode::Unavailable);
    }

    #[test]
    fn test_validation_errors_map_to_code() {
        let err: ApiError = ValidationError::Required {
            field: "supplier".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "supplier is required");
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(ApiError::submit_in_progress()).unwrap();
        assert_eq!(json["code"], "SUBMIT_IN_PROGRESS");
        assert_eq!(json["message"], "A submission is already in progress");
    }
}
