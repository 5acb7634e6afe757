//! # Submission Assembly
//!
//! Turns a draft into the payload the command layer stores.
//!
//! ## Live → Settled
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PurchaseDraft ──breakdown()──► TaxBreakdown (full precision)           │
//! │                                        │                                │
//! │                                        ▼ round2, half away from zero    │
//! │                                 SettledAmounts (Money)                  │
//! │                                        │                                │
//! │                 ┌──────────────────────┴──────────────────────┐         │
//! │                 ▼                                             ▼         │
//! │          PurchaseCreate                                PurchaseUpdate   │
//! │          items: [part] or []                           items: omitted   │
//! │          status: "uploaded"                            status: "uploaded"│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each amount is rounded on its own. The rounded invoice value is therefore
//! not always the sum of the rounded parts; [`crate::reconcile`] absorbs that
//! drift into the manual difference on the way back.

use serde::{Deserialize, Serialize};

use crate::dates::{compact_to_canonical, format_entry_timestamp};
use crate::draft::{EntryContext, PurchaseDraft};
use crate::money::Money;
use crate::tax::TaxBreakdown;
use crate::types::{PurchaseCreate, PurchaseItemPayload, PurchaseUpdate};
use crate::validation::{validate_for_submit, ValidationResult};
use crate::STATUS_UPLOADED;

// =============================================================================
// Submit Mode
// =============================================================================

/// Whether the form creates a new purchase or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubmitMode {
    Create,
    Update { id: i64 },
}

/// A payload ready for the command layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PurchasePayload {
    Create(PurchaseCreate),
    Update(PurchaseUpdate),
}

/// What is still missing before the submit button should be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitReadiness {
    pub needs_supplier: bool,
    /// Only ever set in create mode.
    pub needs_part: bool,
}

impl SubmitReadiness {
    pub fn for_draft(draft: &PurchaseDraft, mode: SubmitMode) -> Self {
        SubmitReadiness {
            needs_supplier: draft.supplier_id().is_none(),
            needs_part: mode == SubmitMode::Create && draft.part().is_none(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.needs_supplier && !self.needs_part
    }
}

// =============================================================================
// Settled Amounts
// =============================================================================

/// The breakdown with every amount rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledAmounts {
    pub basic_value: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub invoice_value: Money,
    pub tds_value: Money,
}

impl SettledAmounts {
    pub fn settle(draft: &PurchaseDraft, breakdown: &TaxBreakdown) -> Self {
        SettledAmounts {
            basic_value: Money::from_decimal(draft.assessable_value()),
            cgst: Money::from_decimal(breakdown.cgst),
            sgst: Money::from_decimal(breakdown.sgst),
            igst: Money::from_decimal(breakdown.igst),
            invoice_value: Money::from_decimal(breakdown.invoice_total),
            tds_value: Money::from_decimal(breakdown.tds),
        }
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builds the payload for either mode.
pub fn build_payload(
    draft: &PurchaseDraft,
    ctx: &EntryContext<'_>,
    mode: SubmitMode,
) -> ValidationResult<PurchasePayload> {
    match mode {
        SubmitMode::Create => build_create_payload(draft, ctx).map(PurchasePayload::Create),
        SubmitMode::Update { id } => {
            build_update_payload(draft, ctx, id).map(PurchasePayload::Update)
        }
    }
}

/// Builds an `add_purchase` payload.
///
/// A single line item (qty 1, price = amount = assessable value) is sent
/// when a part is selected; otherwise `items` is empty.
pub fn build_create_payload(
    draft: &PurchaseDraft,
    ctx: &EntryContext<'_>,
) -> ValidationResult<PurchaseCreate> {
    let supplier_id = validate_for_submit(draft)?;
    let amounts = SettledAmounts::settle(draft, &draft.breakdown(ctx));

    let items = draft
        .part()
        .map(|part| PurchaseItemPayload {
            id: None,
            part_no: Some(part.part_no.clone().unwrap_or_default()),
            description: part.description.clone(),
            qty: 1.0,
            unit: None,
            price: amounts.basic_value,
            amount: Some(amounts.basic_value),
        })
        .into_iter()
        .collect();

    Ok(PurchaseCreate {
        supplier_id,
        invoice_no: draft.invoice_no().to_string(),
        date: compact_to_canonical(draft.invoice_date()),
        entry_date: Some(format_entry_timestamp(draft.entry_date())),
        gst_rate: draft.gst_rate().percentage(),
        basic_value: amounts.basic_value,
        sgst: amounts.sgst,
        cgst: amounts.cgst,
        igst: amounts.igst,
        invoice_value: amounts.invoice_value,
        tds_value: amounts.tds_value,
        narration: Some(draft.narration(ctx)),
        status: STATUS_UPLOADED.to_string(),
        items,
    })
}

/// Builds an `update_purchase` payload for record `id`.
///
/// `items` is omitted so the stored line items are kept.
pub fn build_update_payload(
    draft: &PurchaseDraft,
    ctx: &EntryContext<'_>,
    id: i64,
) -> ValidationResult<PurchaseUpdate> {
    let supplier_id = validate_for_submit(draft)?;
    let amounts = SettledAmounts::settle(draft, &draft.breakdown(ctx));

    Ok(PurchaseUpdate {
        id,
        supplier_id: Some(supplier_id),
        invoice_no: Some(draft.invoice_no().to_string()),
        date: Some(compact_to_canonical(draft.invoice_date())),
        entry_date: Some(format_entry_timestamp(draft.entry_date())),
        gst_rate: Some(draft.gst_rate().percentage()),
        basic_value: Some(amounts.basic_value),
        sgst: Some(amounts.sgst),
        cgst: Some(amounts.cgst),
        igst: Some(amounts.igst),
        invoice_value: Some(amounts.invoice_value),
        tds_value: Some(amounts.tds_value),
        narration: Some(draft.narration(ctx)),
        status: Some(STATUS_UPLOADED.to_string()),
        items: None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
