//! # gstbook-core: Purchase Tax Engine for GSTBook
//!
//! This crate is the **heart** of GSTBook's purchase entry. It contains the
//! GST/TDS computation and the edit-mode reconciliation as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GSTBook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (purchase form)                     │   │
//! │  │   Supplier ──► Invoice ──► Part ──► GST% / Value ──► Narration  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gstbook-entry (session layer)                   │   │
//! │  │    load suppliers, search parts, begin_edit, submit            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gstbook-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌────────┐ │   │
//! │  │   │  tax    │ │  draft  │ │narration │ │ reconcile │ │ submit │ │   │
//! │  │   │ split,  │ │  form   │ │ template │ │ stored →  │ │ draft →│ │   │
//! │  │   │  TDS    │ │  state  │ │          │ │  draft    │ │payload │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └───────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          Command layer (add_purchase, get_suppliers, ...)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Command-layer DTOs (Supplier, PurchaseEntry, payloads) and `TaxRate`
//! - [`money`] - Settled amounts in paise and the single rounding rule
//! - [`tax`] - Home-state detection and the CGST/SGST/IGST/TDS breakdown
//! - [`narration`] - Auto-generated narration text
//! - [`dates`] - Compact ↔ canonical invoice dates
//! - [`draft`] - Editable form state
//! - [`reconcile`] - Stored record → draft
//! - [`submission`] - Draft → payload
//! - [`catalog`] - Supplier and part suggestions
//! - [`validation`] - Submit-time checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the breakdown is recomputed from inputs on every read
//! 2. **No I/O**: suppliers and catalog items are passed in
//! 3. **Round Once**: live values are exact decimals; rounding happens only
//!    when a payload is built
//! 4. **Never Block Typing**: bad numbers read as zero, bad dates pass through
//!
//! ## Example Usage
//!
//! ```rust
//! use gstbook_core::tax::{compute_breakdown, SupplierTaxProfile};
//! use gstbook_core::types::TaxRate;
//! use rust_decimal::Decimal;
//!
//! let out_of_state = SupplierTaxProfile::unregistered();
//! let b = compute_breakdown(
//!     &out_of_state,
//!     TaxRate::from_bps(1800),
//!     Decimal::from(1000),
//!     Decimal::ZERO,
//! );
//! assert_eq!(b.igst, Decimal::from(180));
//! assert_eq!(b.invoice_total, Decimal::from(1180));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod dates;
pub mod draft;
pub mod error;
pub mod money;
pub mod narration;
pub mod reconcile;
pub mod submission;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{EntryContext, LastEntry, PurchaseDraft};
pub use error::ValidationError;
pub use money::Money;
pub use submission::{PurchasePayload, SubmitMode, SubmitReadiness};
pub use tax::{HomeState, SupplierTaxProfile, TaxBreakdown};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// State code of the buyer's GST registration when none is configured.
///
/// "33" is Tamil Nadu.
pub const DEFAULT_HOME_STATE_CODE: &str = "33";

/// Status stamped on every purchase this engine submits.
pub const STATUS_UPLOADED: &str = "uploaded";

/// How many suggestions the type-ahead dropdowns show.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;
