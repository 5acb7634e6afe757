//! # Narration
//!
//! Builds the one-line ledger narration for a purchase:
//!
//! ```text
//! "<part> purchased from <supplier> Invoice no <invoice no> / <invoice date>"
//!     + " TDS amounted <tds> deducted for <rate>% Assessable value"   (TDS only)
//! ```
//!
//! Empty pieces fall back to placeholders: part description, then the raw
//! part query, then `"part"`; supplier name, then `"supplier"`; invoice
//! number, then `"-"`. The invoice date is used exactly as typed.

use rust_decimal::Decimal;

use crate::money::Money;
use crate::tax::SupplierTaxProfile;
use crate::types::PartSelection;

/// Everything the narration template reads.
#[derive(Debug, Clone, Copy)]
pub struct NarrationInputs<'a> {
    pub part: Option<&'a PartSelection>,
    pub part_query: &'a str,
    pub supplier_name: Option<&'a str>,
    pub invoice_no: &'a str,
    pub invoice_date: &'a str,
    pub profile: &'a SupplierTaxProfile,
    /// Live TDS amount; rounded to two decimals for display.
    pub tds: Decimal,
}

/// Renders the narration text.
///
/// ## Example
/// ```rust
/// use gstbook_core::narration::{synthesize, NarrationInputs};
/// use gstbook_core::tax::SupplierTaxProfile;
/// use rust_decimal::Decimal;
///
/// let profile = SupplierTaxProfile::unregistered();
/// let text = synthesize(&NarrationInputs {
///     part: None,
///     part_query: "",
///     supplier_name: None,
///     invoice_no: "",
///     invoice_date: "",
///     profile: &profile,
///     tds: Decimal::ZERO,
/// });
/// assert_eq!(text, "part purchased from supplier Invoice no - / ");
/// ```
pub fn synthesize(inputs: &NarrationInputs<'_>) -> String {
    let part_text = inputs
        .part
        .map(|p| p.description.as_str())
        .filter(|d| !d.is_empty())
        .or_else(|| non_empty(inputs.part_query))
        .unwrap_or("part");
    let supplier_text = inputs.supplier_name.and_then(non_empty).unwrap_or("supplier");
    let invoice_text = non_empty(inputs.invoice_no).unwrap_or("-");

    let mut text = format!(
        "{} purchased from {} Invoice no {} / {}",
        part_text, supplier_text, invoice_text, inputs.invoice_date
    );

    if inputs.profile.deducts_tds() {
        text.push_str(&format!(
            " TDS amounted {} deducted for {}% Assessable value",
            Money::from_decimal(inputs.tds),
            inputs.profile.tds_rate
        ));
    }

    text
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
