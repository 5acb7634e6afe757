//! # Error Types
//!
//! Domain-specific error types for gstbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gstbook-core errors (this file)                                       │
//! │  └── ValidationError  - Draft not ready to submit                      │
//! │                                                                         │
//! │  gstbook-entry errors (separate crate)                                 │
//! │  ├── BackendError     - Command layer rejected / unreachable           │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → ApiError → Frontend                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Malformed invoice dates, non-numeric or out-of-range amount text and
//! unreadable stored entry dates never produce an error here: they pass
//! through, read as zero or fall back to today, so data entry is never
//! blocked mid-keystroke.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Reasons a draft cannot be submitted yet.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Amount must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "supplier".to_string(),
        };
        assert_eq!(err.to_string(), "supplier is required");

        let err = ValidationError::MustNotBeNegative {
            field: "assessable value".to_string(),
        };
        assert_eq!(err.to_string(), "assessable value must not be negative");

        let err = ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "query must be at most 100 characters");
    }
}
