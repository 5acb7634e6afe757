//! # Purchase Draft
//!
//! The editable state of the purchase form.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Purchase Draft Lifecycle                           │
//! │                                                                         │
//! │   new(today) ──► user input (setters) ──► breakdown() / narration()     │
//! │       ▲                 │                     (recomputed every read)   │
//! │       │                 ▼                                               │
//! │       │          submit (create) ──ok──► reset_after_create()           │
//! │       │                 │                 + snapshot() → LastEntry      │
//! │       │                 └──err──► draft untouched                       │
//! │       │                                                                 │
//! │   reconcile::prefill_from_record() ──► draft in edit mode               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Narration Flag
//! `narration_touched` flips to true the moment the user types into the
//! narration field. From then on [`PurchaseDraft::narration`] returns the
//! typed text and ignores every other input. Only [`PurchaseDraft::reset_after_create`]
//! (or loading a record without a stored narration) flips it back.
//!
//! ## Free-Text Numbers
//! Amount fields accept whatever the user typed. Text that does not parse
//! reads as zero; see [`parse_amount`].

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::narration::{self, NarrationInputs};
use crate::tax::{compute_breakdown, HomeState, SupplierTaxProfile, TaxBreakdown};
use crate::types::{CatalogItem, PartSelection, Supplier, TaxRate};

/// Parses a typed amount, reading anything unparseable as zero.
///
/// ## Example
/// ```rust
/// use gstbook_core::draft::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount(" 1234.50 "), Decimal::new(123450, 2));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// assert_eq!(parse_amount("12abc"), Decimal::ZERO);
/// ```
pub fn parse_amount(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Entry Context
// =============================================================================

/// Application context the draft reads but does not own.
///
/// Passed explicitly to every derived-value call, so the same draft can be
/// evaluated against a freshly loaded supplier list.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    /// Loaded supplier list; empty until the first load completes.
    pub suppliers: &'a [Supplier],
    pub home_state: &'a HomeState,
}

impl<'a> EntryContext<'a> {
    pub fn new(suppliers: &'a [Supplier], home_state: &'a HomeState) -> Self {
        EntryContext {
            suppliers,
            home_state,
        }
    }

    /// Looks up a supplier in the loaded list.
    pub fn supplier(&self, id: Option<i64>) -> Option<&'a Supplier> {
        let id = id?;
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Tax profile of the supplier, or the unregistered profile when it is
    /// not selected or not loaded.
    pub fn profile(&self, id: Option<i64>) -> SupplierTaxProfile {
        self.supplier(id)
            .map(|s| SupplierTaxProfile::from_supplier(s, self.home_state))
            .unwrap_or_else(SupplierTaxProfile::unregistered)
    }
}

// =============================================================================
// Last Entry
// =============================================================================

/// What "duplicate last entry" restores. Invoice number and dates are
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastEntry {
    pub supplier_id: Option<i64>,
    pub supplier_search: String,
    pub gst_rate: TaxRate,
    pub part: Option<PartSelection>,
    pub part_query: String,
}

// =============================================================================
// Purchase Draft
// =============================================================================

/// The purchase form's editable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub(crate) entry_date: NaiveDate,
    pub(crate) supplier_id: Option<i64>,
    pub(crate) supplier_search: String,
    pub(crate) invoice_no: String,
    /// Compact `DD-MM-YY`, exactly as typed.
    pub(crate) invoice_date: String,
    pub(crate) gst_rate: TaxRate,
    pub(crate) assessable_value: Decimal,
    pub(crate) manual_difference: Decimal,
    pub(crate) part: Option<PartSelection>,
    pub(crate) part_query: String,
    pub(crate) narration: String,
    pub(crate) narration_touched: bool,
}

impl PurchaseDraft {
    /// A blank draft dated `entry_date`.
    pub fn new(entry_date: NaiveDate) -> Self {
        PurchaseDraft {
            entry_date,
            supplier_id: None,
            supplier_search: String::new(),
            invoice_no: String::new(),
            invoice_date: String::new(),
            gst_rate: TaxRate::zero(),
            assessable_value: Decimal::ZERO,
            manual_difference: Decimal::ZERO,
            part: None,
            part_query: String::new(),
            narration: String::new(),
            narration_touched: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub fn supplier_id(&self) -> Option<i64> {
        self.supplier_id
    }

    pub fn supplier_search(&self) -> &str {
        &self.supplier_search
    }

    pub fn invoice_no(&self) -> &str {
        &self.invoice_no
    }

    pub fn invoice_date(&self) -> &str {
        &self.invoice_date
    }

    pub fn gst_rate(&self) -> TaxRate {
        self.gst_rate
    }

    pub fn assessable_value(&self) -> Decimal {
        self.assessable_value
    }

    pub fn manual_difference(&self) -> Decimal {
        self.manual_difference
    }

    pub fn part(&self) -> Option<&PartSelection> {
        self.part.as_ref()
    }

    pub fn part_query(&self) -> &str {
        &self.part_query
    }

    pub fn is_narration_touched(&self) -> bool {
        self.narration_touched
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn set_entry_date(&mut self, date: NaiveDate) {
        self.entry_date = date;
    }

    /// Updates the supplier search text without changing the selection.
    pub fn set_supplier_search(&mut self, text: impl Into<String>) {
        self.supplier_search = text.into();
    }

    /// Selects a supplier. The part selection and part query are cleared
    /// because suggestions are narrowed per supplier.
    pub fn select_supplier(&mut self, supplier: &Supplier) {
        self.supplier_id = Some(supplier.id);
        self.supplier_search = supplier.name.clone();
        self.clear_part();
    }

    /// Selects the first supplier matching the current search text.
    ///
    /// Returns false (and changes nothing) when nothing matches.
    pub fn accept_first_supplier_match(&mut self, suppliers: &[Supplier]) -> bool {
        let first = catalog::suggest_suppliers(suppliers, &self.supplier_search, 1)
            .into_iter()
            .next()
            .cloned();
        match first {
            Some(supplier) => {
                self.select_supplier(&supplier);
                true
            }
            None => false,
        }
    }

    pub fn set_invoice_no(&mut self, invoice_no: impl Into<String>) {
        self.invoice_no = invoice_no.into();
    }

    pub fn set_invoice_date(&mut self, compact: impl Into<String>) {
        self.invoice_date = compact.into();
    }

    pub fn set_gst_rate(&mut self, rate: TaxRate) {
        self.gst_rate = rate;
    }

    /// Sets the GST rate from typed text; garbage and negatives read as 0%.
    pub fn set_gst_rate_text(&mut self, text: &str) {
        self.gst_rate = TaxRate::from_decimal_percentage(parse_amount(text));
    }

    pub fn set_assessable_value(&mut self, value: Decimal) {
        self.assessable_value = value;
    }

    pub fn set_assessable_text(&mut self, text: &str) {
        self.assessable_value = parse_amount(text);
    }

    pub fn set_manual_difference(&mut self, value: Decimal) {
        self.manual_difference = value;
    }

    pub fn set_difference_text(&mut self, text: &str) {
        self.manual_difference = parse_amount(text);
    }

    /// Updates the part search text without changing the selection.
    pub fn set_part_query(&mut self, text: impl Into<String>) {
        self.part_query = text.into();
    }

    /// Selects a catalog item.
    ///
    /// The part query becomes the item's display label, and the GST rate
    /// is replaced by the item's default when it has a positive one.
    pub fn select_part(&mut self, item: &CatalogItem) {
        let part = PartSelection::from(item);
        self.part_query = part.display_label();
        if let Some(rate) = part.default_gst_rate() {
            self.gst_rate = rate;
        }
        self.part = Some(part);
    }

    pub fn clear_part(&mut self) {
        self.part = None;
        self.part_query.clear();
    }

    /// Records text typed into the narration field.
    ///
    /// Auto-synthesis stops from here on, even if the text is emptied.
    pub fn set_narration(&mut self, text: impl Into<String>) {
        self.narration = text.into();
        self.narration_touched = true;
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Computes the live tax breakdown against the given context.
    pub fn breakdown(&self, ctx: &EntryContext<'_>) -> TaxBreakdown {
        compute_breakdown(
            &ctx.profile(self.supplier_id),
            self.gst_rate,
            self.assessable_value,
            self.manual_difference,
        )
    }

    /// The auto-generated narration for the current inputs.
    pub fn auto_narration(&self, ctx: &EntryContext<'_>) -> String {
        let profile = ctx.profile(self.supplier_id);
        let tds = self.breakdown(ctx).tds;
        narration::synthesize(&NarrationInputs {
            part: self.part.as_ref(),
            part_query: &self.part_query,
            supplier_name: ctx.supplier(self.supplier_id).map(|s| s.name.as_str()),
            invoice_no: &self.invoice_no,
            invoice_date: &self.invoice_date,
            profile: &profile,
            tds,
        })
    }

    /// The narration that would be submitted now: typed text once touched,
    /// otherwise the auto-generated text.
    pub fn narration(&self, ctx: &EntryContext<'_>) -> String {
        if self.narration_touched {
            self.narration.clone()
        } else {
            self.auto_narration(ctx)
        }
    }

    // -------------------------------------------------------------------------
    // After create
    // -------------------------------------------------------------------------

    /// Captures what "duplicate last entry" restores.
    pub fn snapshot(&self) -> LastEntry {
        LastEntry {
            supplier_id: self.supplier_id,
            supplier_search: self.supplier_search.clone(),
            gst_rate: self.gst_rate,
            part: self.part.clone(),
            part_query: self.part_query.clone(),
        }
    }

    /// Restores supplier, GST rate and part from a snapshot. Invoice
    /// number, dates and amounts are left as they are.
    pub fn apply_last_entry(&mut self, last: &LastEntry) {
        self.supplier_id = last.supplier_id;
        self.supplier_search = last.supplier_search.clone();
        self.gst_rate = last.gst_rate;
        self.part = last.part.clone();
        self.part_query = last.part_query.clone();
    }

    /// Clears every field except the entry date, ready for the next entry.
    pub fn reset_after_create(&mut self) {
        *self = PurchaseDraft::new(self.entry_date);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
