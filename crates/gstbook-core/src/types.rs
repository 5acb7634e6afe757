//! # Domain Types
//!
//! Types exchanged with the native command layer, plus the rate type used
//! by the tax engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  READ from command layer          SENT to command layer                 │
//! │  ───────────────────────          ─────────────────────                 │
//! │  ┌─────────────────┐              ┌─────────────────────┐               │
//! │  │    Supplier     │              │   PurchaseCreate    │               │
//! │  │  gst_no         │──tax──┐      │   (+ items[])       │               │
//! │  │  tds_flag/rate  │ profile│     └─────────────────────┘               │
//! │  └─────────────────┘       │      ┌─────────────────────┐               │
//! │  ┌─────────────────┐       ├─────►│   PurchaseUpdate    │               │
//! │  │  CatalogItem    │──part─┘      │   (id + partial)    │               │
//! │  │  part_no, gst%  │ selection    └─────────────────────┘               │
//! │  └─────────────────┘                        │                           │
//! │  ┌─────────────────┐                        ▼                           │
//! │  │ PurchaseEntry   │◄────────── returned by add/update                  │
//! │  │ (stored record) │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the command layer's snake_case JSON exactly.

use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// A percentage rate (GST or TDS), held exactly as entered.
///
/// `18` means 18%. The value is never rounded: a TDS rate of `0.075`
/// stays `0.075`, so `assessable × rate / 100` is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "number")] Decimal);

impl TaxRate {
    /// Creates a tax rate from basis points (`1800` is 18%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(i64::from(bps), 2))
    }

    /// Creates a tax rate from a percentage such as `18.0` or `0.075`.
    ///
    /// Negative or non-finite input reads as zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() {
            return TaxRate::zero();
        }
        Decimal::from_f64(pct)
            .map(TaxRate::from_decimal_percentage)
            .unwrap_or_default()
    }

    /// Creates a tax rate from a decimal percentage. Negative reads as zero.
    pub fn from_decimal_percentage(pct: Decimal) -> Self {
        if pct.is_sign_negative() {
            TaxRate::zero()
        } else {
            TaxRate(pct.normalize())
        }
    }

    /// Returns the rate as a percentage (for the wire).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns the percentage as an exact decimal.
    #[inline]
    pub fn decimal_percentage(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier for an amount (`0.18` for 18%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Two-decimal rendering used in narration text (`2.00`, `0.08`).
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", shown)
    }
}

/// Serialized as the percentage number the UI shows (`18`, `0.1`).
impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.percentage())
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        Ok(TaxRate::from_percentage(pct))
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier as returned by `get_suppliers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    /// GSTIN; the first two characters are the state code.
    pub gst_no: Option<String>,
    /// 2-digit state code, informational only.
    pub state_code: Option<String>,
    /// Stored as INTEGER 0/1 by the command layer.
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub tds_flag: bool,
    /// TDS percentage.
    pub tds_rate: Option<f64>,
    pub contact: Option<String>,
    pub email: Option<String>,
}

/// Accepts `true`/`false` as well as `0`/`1` for a boolean column.
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

/// Paging parameters for the supplier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierQuery {
    pub page: i64,
    pub page_size: i64,
    pub name_filter: Option<String>,
}

impl SupplierQuery {
    /// Largest page the command layer will serve.
    pub const MAX_PAGE_SIZE: i64 = 200;

    /// Creates a query for the first page.
    pub fn first_page(page_size: i64) -> Self {
        SupplierQuery {
            page: 1,
            page_size,
            name_filter: None,
        }
        .clamped()
    }

    /// Clamps page to >= 1 and page size to 1..=200.
    pub fn clamped(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, Self::MAX_PAGE_SIZE);
        self
    }

    /// Row offset of the first record on this page, saturating at
    /// `i64::MAX`.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size.max(0))
    }
}

impl Default for SupplierQuery {
    fn default() -> Self {
        SupplierQuery::first_page(20)
    }
}

/// A page of results from a list command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// =============================================================================
// Catalog
// =============================================================================

/// An item-master entry returned by the catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    pub id: i64,
    pub part_no: Option<String>,
    pub description: String,
    pub gst_percent: Option<f64>,
    pub supplier_id: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// The part currently chosen on the purchase form.
///
/// Transient: it lives only for one form session and is never sent back
/// as-is. Edit-mode prefill always clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartSelection {
    pub id: Option<i64>,
    pub part_no: Option<String>,
    pub description: String,
    pub default_gst_percent: Option<f64>,
    pub preferred_supplier_id: Option<i64>,
}

impl PartSelection {
    /// Text shown in the part field after a selection: `"<part_no> — <description>"`.
    pub fn display_label(&self) -> String {
        let part_no = match self.part_no.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "-",
        };
        format!("{} — {}", part_no, self.description)
    }

    /// The item's default GST rate when it carries a positive one.
    pub fn default_gst_rate(&self) -> Option<TaxRate> {
        self.default_gst_percent
            .filter(|pct| *pct > 0.0)
            .map(TaxRate::from_percentage)
    }
}

impl From<&CatalogItem> for PartSelection {
    fn from(item: &CatalogItem) -> Self {
        PartSelection {
            id: Some(item.id),
            part_no: Some(item.part_no.clone().unwrap_or_default()),
            description: item.description.clone(),
            default_gst_percent: item.gst_percent,
            preferred_supplier_id: item.supplier_id,
        }
    }
}

// =============================================================================
// Purchase Entry (stored record)
// =============================================================================

/// A purchase as stored by the command layer.
///
/// There is no manual-difference column: it is folded into
/// `invoice_value` and recovered on load by [`crate::reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseEntry {
    pub id: i64,
    pub supplier_id: i64,
    pub invoice_no: String,
    /// Invoice date, `YYYY-MM-DD`.
    pub date: String,
    /// Entry timestamp, `YYYY-MM-DD HH:MM:SS` or ISO.
    pub entry_date: String,
    pub gst_rate: f64,
    pub basic_value: Money,
    pub sgst: Money,
    pub cgst: Money,
    pub igst: Money,
    pub invoice_value: Money,
    pub tds_value: Money,
    pub narration: Option<String>,
    pub status: String,
}

impl PurchaseEntry {
    /// Sum of the three GST components as stored.
    pub fn total_gst(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A line item sent with a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseItemPayload {
    pub id: Option<i64>,
    pub part_no: Option<String>,
    pub description: String,
    pub qty: f64,
    pub unit: Option<String>,
    pub price: Money,
    pub amount: Option<Money>,
}

/// Payload for `add_purchase`. Every monetary field is pre-rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseCreate {
    pub supplier_id: i64,
    pub invoice_no: String,
    pub date: String,
    pub entry_date: Option<String>,
    pub gst_rate: f64,
    pub basic_value: Money,
    pub sgst: Money,
    pub cgst: Money,
    pub igst: Money,
    pub invoice_value: Money,
    pub tds_value: Money,
    pub narration: Option<String>,
    pub status: String,
    pub items: Vec<PurchaseItemPayload>,
}

/// Payload for `update_purchase`. Absent fields keep their stored value;
/// absent `items` keeps the stored items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseUpdate {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sgst: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgst: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub igst: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tds_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PurchaseItemPayload>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(18.0), TaxRate::from_bps(1800));
        assert_eq!(TaxRate::from_percentage(0.1).decimal_percentage(), dec!(0.1));
        assert_eq!(TaxRate::from_percentage(-5.0), TaxRate::zero());
        assert_eq!(TaxRate::from_percentage(f64::NAN), TaxRate::zero());
    }

    #[test]
    fn test_tax_rate_keeps_sub_basis_point_precision() {
        let rate = TaxRate::from_percentage(0.075);
        assert_eq!(rate.decimal_percentage(), dec!(0.075));
        assert_eq!(rate.fraction(), dec!(0.00075));
        assert_eq!(dec!(100000) * rate.fraction(), dec!(75));
        assert_eq!(rate.to_string(), "0.08");
    }

    #[test]
    fn test_tax_rate_fraction_is_exact() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.fraction(), Decimal::new(18, 2));
        assert_eq!(rate.decimal_percentage(), dec!(18));
        assert_eq!(rate.to_string(), "18.00");
        assert!((rate.percentage() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tax_rate_serializes_as_percentage() {
        let json = serde_json::to_string(&TaxRate::from_bps(250)).unwrap();
        assert_eq!(json, "2.5");
        let back: TaxRate = serde_json::from_str("18").unwrap();
        assert_eq!(back, TaxRate::from_bps(1800));
    }

    #[test]
    fn test_supplier_tds_flag_accepts_integer_and_bool() {
        let json = r#"{"id":1,"name":"Acme","gst_no":"33ABCDE1234F1Z5","state_code":"33",
            "tds_flag":1,"tds_rate":2.0,"contact":null,"email":null}"#;
        let supplier: Supplier = serde_json::from_str(json).unwrap();
        assert!(supplier.tds_flag);

        let json = r#"{"id":2,"name":"Beta","gst_no":null,"state_code":null,
            "tds_flag":false,"tds_rate":null,"contact":null,"email":null}"#;
        let supplier: Supplier = serde_json::from_str(json).unwrap();
        assert!(!supplier.tds_flag);
    }

    #[test]
    fn test_supplier_query_clamps() {
        let q = SupplierQuery {
            page: 0,
            page_size: 5000,
            name_filter: None,
        }
        .clamped();
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 200);
        assert_eq!(q.offset(), 0);

        let q = SupplierQuery {
            page: 3,
            page_size: 20,
            name_filter: None,
        };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_supplier_query_offset_saturates() {
        let q = SupplierQuery {
            page: i64::MAX,
            page_size: 200,
            name_filter: None,
        }
        .clamped();
        assert_eq!(q.offset(), i64::MAX);
    }

    #[test]
    fn test_part_selection_label() {
        let item = CatalogItem {
            id: 7,
            part_no: Some("BRG-6204".to_string()),
            description: "Ball bearing".to_string(),
            gst_percent: Some(18.0),
            supplier_id: Some(3),
            active: true,
        };
        let part = PartSelection::from(&item);
        assert_eq!(part.display_label(), "BRG-6204 — Ball bearing");
        assert_eq!(part.default_gst_rate(), Some(TaxRate::from_bps(1800)));

        let bare = PartSelection {
            part_no: None,
            default_gst_percent: Some(0.0),
            ..part
        };
        assert_eq!(bare.display_label(), "- — Ball bearing");
        assert_eq!(bare.default_gst_rate(), None);
    }

    #[test]
    fn test_update_payload_omits_absent_fields() {
        let update = PurchaseUpdate {
            id: 9,
            invoice_no: Some("INV-1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["id"], 9);
        assert_eq!(json["invoice_no"], "INV-1");
        assert!(json.get("items").is_none());
        assert!(json.get("cgst").is_none());
    }
}
