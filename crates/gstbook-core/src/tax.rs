//! # Tax Module
//!
//! Forward computation of the GST split, TDS and invoice total for a single
//! purchase line.
//!
//! ## The Split Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  GST Split by Supplier Location                         │
//! │                                                                         │
//! │  supplier GSTIN "33AAACT..."     home state code "33"                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  prefix matches? ──yes──► INTRA-STATE   CGST = SGST = GST / 2, IGST = 0 │
//! │        │                                                                │
//! │        no (or no GSTIN)                                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  INTER-STATE                            CGST = SGST = 0,   IGST = GST   │
//! │                                                                         │
//! │  GST rate == 0 ──────────────────────► all three are 0                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Goes Into the Total
//! ```text
//! invoice_total = assessable + CGST + SGST + IGST + manual_difference
//!
//! TDS is computed and shown, but is a withholding: it is NOT subtracted
//! from the invoice total. The manual difference is NOT taxed.
//! ```
//!
//! Everything here is live: full precision, no rounding. Rounding happens
//! once, in [`crate::submission`], via [`crate::money::round2`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Supplier, TaxRate};
use crate::DEFAULT_HOME_STATE_CODE;

// =============================================================================
// Home State
// =============================================================================

/// The state code of the buyer's own GST registration.
///
/// A supplier whose GSTIN starts with this code is intra-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeState {
    code: String,
}

impl HomeState {
    /// Creates a home state from a two-digit state code such as `"33"`.
    pub fn new(code: impl Into<String>) -> Self {
        HomeState { code: code.into() }
    }

    /// Returns the configured code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// True iff `gst_no` is present and begins with the home-state code.
    ///
    /// ## Example
    /// ```rust
    /// use gstbook_core::tax::HomeState;
    ///
    /// let home = HomeState::new("33");
    /// assert!(home.matches(Some("33AAACT2727Q1ZW")));
    /// assert!(!home.matches(Some("29AAACT2727Q1ZW")));
    /// assert!(!home.matches(None));
    /// ```
    pub fn matches(&self, gst_no: Option<&str>) -> bool {
        match gst_no {
            Some(gst) if !self.code.is_empty() => gst.starts_with(self.code.as_str()),
            _ => false,
        }
    }
}

impl Default for HomeState {
    fn default() -> Self {
        HomeState::new(DEFAULT_HOME_STATE_CODE)
    }
}

// =============================================================================
// Supplier Tax Profile
// =============================================================================

/// The slice of a supplier the tax engine reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SupplierTaxProfile {
    pub gst_number: Option<String>,
    pub is_home_state: bool,
    pub tds_enabled: bool,
    /// Zero when the supplier has no rate on file.
    pub tds_rate: TaxRate,
}

impl SupplierTaxProfile {
    /// Builds the profile of a registered supplier.
    pub fn from_supplier(supplier: &Supplier, home: &HomeState) -> Self {
        SupplierTaxProfile {
            gst_number: supplier.gst_no.clone(),
            is_home_state: home.matches(supplier.gst_no.as_deref()),
            tds_enabled: supplier.tds_flag,
            tds_rate: supplier
                .tds_rate
                .map(TaxRate::from_percentage)
                .unwrap_or_default(),
        }
    }

    /// The profile used while no supplier is selected or the supplier list
    /// has not loaded: inter-state, no TDS.
    pub fn unregistered() -> Self {
        SupplierTaxProfile::default()
    }

    /// True when a TDS clause belongs in the narration.
    pub fn deducts_tds(&self) -> bool {
        self.tds_enabled && !self.tds_rate.is_zero()
    }
}

// =============================================================================
// GST Split
// =============================================================================

/// Which GST components apply to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstSplit {
    /// Supplier in the home state: CGST + SGST.
    IntraState,
    /// Supplier elsewhere (or unknown): IGST.
    InterState,
    /// Zero-rated: no GST at all.
    Exempt,
}

impl GstSplit {
    /// Chooses the split for a supplier location and rate.
    pub fn for_transaction(is_home_state: bool, gst_rate: TaxRate) -> Self {
        if gst_rate.is_zero() {
            GstSplit::Exempt
        } else if is_home_state {
            GstSplit::IntraState
        } else {
            GstSplit::InterState
        }
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// The derived amounts for one purchase line, at full precision.
///
/// Never stored: recompute it from the draft whenever it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub split: GstSplit,
    /// `assessable × rate`, before splitting.
    pub gst_amount: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    /// Withholding; informational, not part of `invoice_total`.
    pub tds: Decimal,
    pub invoice_total: Decimal,
}

impl TaxBreakdown {
    /// A breakdown with every amount at zero.
    pub fn zero(split: GstSplit) -> Self {
        TaxBreakdown {
            split,
            gst_amount: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: Decimal::ZERO,
            tds: Decimal::ZERO,
            invoice_total: Decimal::ZERO,
        }
    }

    /// CGST + SGST + IGST.
    pub fn total_gst(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

/// Computes the tax breakdown for a purchase line.
///
/// Pure and cheap: safe to call on every keystroke. Inputs too large to
/// compute with read as a zero breakdown, like any other unusable input.
///
/// ## Example
/// ```rust
/// use gstbook_core::tax::{compute_breakdown, SupplierTaxProfile};
/// use gstbook_core::types::TaxRate;
/// use rust_decimal::Decimal;
///
/// let profile = SupplierTaxProfile { is_home_state: true, ..Default::default() };
/// let b = compute_breakdown(
///     &profile,
///     TaxRate::from_bps(1800),
///     Decimal::from(1000),
///     Decimal::ZERO,
/// );
/// assert_eq!(b.cgst, Decimal::from(90));
/// assert_eq!(b.sgst, Decimal::from(90));
/// assert_eq!(b.igst, Decimal::ZERO);
/// assert_eq!(b.invoice_total, Decimal::from(1180));
/// ```
pub fn compute_breakdown(
    profile: &SupplierTaxProfile,
    gst_rate: TaxRate,
    assessable_value: Decimal,
    manual_difference: Decimal,
) -> TaxBreakdown {
    let split = GstSplit::for_transaction(profile.is_home_state, gst_rate);
    checked_breakdown(profile, gst_rate, split, assessable_value, manual_difference)
        .unwrap_or_else(|| TaxBreakdown::zero(split))
}

/// `None` when an amount leaves the `Decimal` range.
fn checked_breakdown(
    profile: &SupplierTaxProfile,
    gst_rate: TaxRate,
    split: GstSplit,
    assessable_value: Decimal,
    manual_difference: Decimal,
) -> Option<TaxBreakdown> {
    let gst_amount = assessable_value.checked_mul(gst_rate.fraction())?;

    let (cgst, sgst, igst) = match split {
        GstSplit::IntraState => {
            let half = gst_amount / Decimal::TWO;
            (half, half, Decimal::ZERO)
        }
        GstSplit::InterState => (Decimal::ZERO, Decimal::ZERO, gst_amount),
        GstSplit::Exempt => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    };

    let tds = if profile.tds_enabled {
        assessable_value.checked_mul(profile.tds_rate.fraction())?
    } else {
        Decimal::ZERO
    };

    let invoice_total = assessable_value
        .checked_add(cgst)?
        .checked_add(sgst)?
        .checked_add(igst)?
        .checked_add(manual_difference)?;

    Some(TaxBreakdown {
        split,
        gst_amount,
        cgst,
        sgst,
        igst,
        tds,
        invoice_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn supplier(gst_no: Option<&str>, tds_flag: bool, tds_rate: Option<f64>) -> Supplier {
        Supplier {
            id: 1,
            name: "Sri Murugan Traders".to_string(),
            gst_no: gst_no.map(str::to_string),
            state_code: None,
            tds_flag,
            tds_rate,
            contact: None,
            email: None,
        }
    }

    fn home() -> SupplierTaxProfile {
        SupplierTaxProfile::from_supplier(
            &supplier(Some("33AAACT2727Q1ZW"), false, None),
            &HomeState::default(),
        )
    }

    fn out_of_state() -> SupplierTaxProfile {
        SupplierTaxProfile::from_supplier(
            &supplier(Some("29AAACT2727Q1ZW"), false, None),
            &HomeState::default(),
        )
    }

    #[test]
    fn test_home_state_prefix_match() {
        let home = HomeState::new("33");
        assert!(home.matches(Some("33")));
        assert!(!home.matches(Some("3")));
        assert!(!home.matches(Some("")));
        assert!(!home.matches(Some(" 33ABC")));
        assert!(!HomeState::new("").matches(Some("33ABC")));
    }

    #[test]
    fn test_profile_from_supplier() {
        let p = SupplierTaxProfile::from_supplier(
            &supplier(Some("33ABC"), true, Some(2.0)),
            &HomeState::default(),
        );
        assert!(p.is_home_state);
        assert!(p.tds_enabled);
        assert_eq!(p.tds_rate, TaxRate::from_bps(200));
        assert!(p.deducts_tds());

        let no_rate = SupplierTaxProfile::from_supplier(
            &supplier(None, true, None),
            &HomeState::default(),
        );
        assert!(!no_rate.is_home_state);
        assert!(no_rate.tds_rate.is_zero());
        assert!(!no_rate.deducts_tds());
    }

    #[test]
    fn test_injected_home_state() {
        let karnataka = HomeState::new("29");
        let p = SupplierTaxProfile::from_supplier(
            &supplier(Some("29AAACT2727Q1ZW"), false, None),
            &karnataka,
        );
        assert!(p.is_home_state);
    }

    #[test]
    fn test_home_state_scenario_1000_at_18() {
        let b = compute_breakdown(&home(), TaxRate::from_bps(1800), dec!(1000), dec!(0));
        assert_eq!(b.split, GstSplit::IntraState);
        assert_eq!(b.cgst, dec!(90));
        assert_eq!(b.sgst, dec!(90));
        assert_eq!(b.igst, dec!(0));
        assert_eq!(b.invoice_total, dec!(1180));
    }

    #[test]
    fn test_out_of_state_scenario_1000_at_18() {
        let b = compute_breakdown(&out_of_state(), TaxRate::from_bps(1800), dec!(1000), dec!(0));
        assert_eq!(b.split, GstSplit::InterState);
        assert_eq!(b.cgst, dec!(0));
        assert_eq!(b.sgst, dec!(0));
        assert_eq!(b.igst, dec!(180));
        assert_eq!(b.invoice_total, dec!(1180));
    }

    #[test]
    fn test_tds_at_two_percent_does_not_touch_total() {
        let profile = SupplierTaxProfile::from_supplier(
            &supplier(Some("33ABC"), true, Some(2.0)),
            &HomeState::default(),
        );
        let b = compute_breakdown(&profile, TaxRate::from_bps(1800), dec!(1000), dec!(0));
        assert_eq!(b.tds, dec!(20));
        assert_eq!(b.invoice_total, dec!(1180));
    }

    #[test]
    fn test_tds_flag_off_ignores_rate() {
        let profile = SupplierTaxProfile::from_supplier(
            &supplier(Some("33ABC"), false, Some(10.0)),
            &HomeState::default(),
        );
        let b = compute_breakdown(&profile, TaxRate::from_bps(500), dec!(1000), dec!(0));
        assert_eq!(b.tds, dec!(0));
    }

    #[test]
    fn test_manual_difference_is_not_taxed() {
        let b = compute_breakdown(&home(), TaxRate::from_bps(1800), dec!(1000), dec!(-0.40));
        assert_eq!(b.gst_amount, dec!(180));
        assert_eq!(b.invoice_total, dec!(1179.60));
    }

    #[test]
    fn test_unregistered_profile_is_inter_state() {
        let b = compute_breakdown(
            &SupplierTaxProfile::unregistered(),
            TaxRate::from_bps(1200),
            dec!(250),
            dec!(0),
        );
        assert_eq!(b.igst, dec!(30));
        assert_eq!(b.tds, dec!(0));
    }

    #[test]
    fn test_live_values_keep_full_precision() {
        let b = compute_breakdown(&home(), TaxRate::from_bps(1800), dec!(1234.5), dec!(0));
        assert_eq!(b.cgst, dec!(111.105));
        assert_eq!(b.invoice_total, dec!(1456.71));
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000).prop_map(|paise| Decimal::new(paise, 2))
    }

    #[test]
    fn test_fractional_tds_rate_is_not_rounded() {
        let profile = SupplierTaxProfile::from_supplier(
            &supplier(Some("33ABC"), true, Some(0.075)),
            &HomeState::default(),
        );
        let b = compute_breakdown(&profile, TaxRate::from_bps(1800), dec!(100000), dec!(0));
        assert_eq!(b.tds, dec!(75));
        assert_eq!(b.invoice_total, dec!(118000));
    }

    #[test]
    fn test_fractional_gst_rate_is_not_rounded() {
        let b = compute_breakdown(
            &out_of_state(),
            TaxRate::from_percentage(0.125),
            dec!(1000),
            dec!(0),
        );
        assert_eq!(b.igst, dec!(1.25));
    }

    #[test]
    fn test_out_of_range_amount_reads_as_zero() {
        let b = compute_breakdown(
            &home(),
            TaxRate::from_bps(1800),
            dec!(70000000000000000000000000000),
            dec!(0),
        );
        assert_eq!(b, TaxBreakdown::zero(GstSplit::IntraState));

        let total = compute_breakdown(
            &home(),
            TaxRate::zero(),
            Decimal::MAX,
            Decimal::MAX,
        );
        assert_eq!(total.invoice_total, Decimal::ZERO);
    }

    fn rate() -> impl Strategy<Value = TaxRate> {
        (1u32..=4000).prop_map(TaxRate::from_bps)
    }

    proptest! {
        #[test]
        fn prop_home_state_splits_evenly(assessable in amount(), rate in rate()) {
            let b = compute_breakdown(&home(), rate, assessable, Decimal::ZERO);
            prop_assert_eq!(b.igst, Decimal::ZERO);
            prop_assert_eq!(b.cgst, b.sgst);
            prop_assert_eq!(b.cgst, b.gst_amount / Decimal::TWO);
        }

        #[test]
        fn prop_out_of_state_is_all_igst(assessable in amount(), rate in rate()) {
            let b = compute_breakdown(&out_of_state(), rate, assessable, Decimal::ZERO);
            prop_assert_eq!(b.cgst, Decimal::ZERO);
            prop_assert_eq!(b.sgst, Decimal::ZERO);
            prop_assert_eq!(b.igst, b.gst_amount);
        }

        #[test]
        fn prop_zero_rate_has_no_gst(assessable in amount(), is_home in any::<bool>()) {
            let profile = SupplierTaxProfile { is_home_state: is_home, ..Default::default() };
            let b = compute_breakdown(&profile, TaxRate::zero(), assessable, Decimal::ZERO);
            prop_assert_eq!(b.split, GstSplit::Exempt);
            prop_assert_eq!(b.total_gst(), Decimal::ZERO);
        }

        #[test]
        fn prop_total_never_subtracts_tds(
            assessable in amount(),
            rate in rate(),
            tds_bps in 0u32..=2000,
            diff_paise in -100_000i64..100_000,
            is_home in any::<bool>(),
        ) {
            let profile = SupplierTaxProfile {
                is_home_state: is_home,
                tds_enabled: true,
                tds_rate: TaxRate::from_bps(tds_bps),
                ..Default::default()
            };
            let diff = Decimal::new(diff_paise, 2);
            let b = compute_breakdown(&profile, rate, assessable, diff);
            prop_assert_eq!(b.invoice_total, assessable + b.cgst + b.sgst + b.igst + diff);
        }
    }
}
