//! # Validation Module
//!
//! Submit-time checks for a purchase draft.
//!
//! ## What Gets Checked, and When
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  While typing: NOTHING                                                  │
//! │  ├── Bad numbers read as 0 (draft::parse_amount)                        │
//! │  └── Bad dates pass through (dates::compact_to_canonical)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  On submit: THIS MODULE                                                 │
//! │  ├── Supplier selected                                                  │
//! │  └── Assessable value not negative                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Command layer: NOT NULL / foreign key constraints                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gstbook_core::validation::{validate_non_negative, validate_search_query};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_non_negative("assessable value", Decimal::ZERO).is_ok());
//! assert_eq!(validate_search_query("  bearing ").unwrap(), "bearing");
//! ```

use rust_decimal::Decimal;

use crate::draft::PurchaseDraft;
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates that an amount is not negative.
pub fn validate_non_negative(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Draft Validator
// =============================================================================

/// Checks that a draft can be turned into a payload.
///
/// ## Returns
/// The selected supplier id.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Ctrl+Enter on the purchase form                                        │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_for_submit(draft) ← THIS FUNCTION                             │
/// │       │                                                                 │
/// │       ├── no supplier? → "supplier is required"                         │
/// │       ├── assessable < 0? → "assessable value must not be negative"     │
/// │       │                                                                 │
/// │       └── OK → build payload                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_for_submit(draft: &PurchaseDraft) -> ValidationResult<i64> {
    let supplier_id = draft.supplier_id().ok_or_else(|| ValidationError::Required {
        field: "supplier".to_string(),
    })?;

    validate_non_negative("assessable value", draft.assessable_value())?;

    Ok(supplier_id)
}

// =============================================================================
// Unit Tests
// =============================================================================
