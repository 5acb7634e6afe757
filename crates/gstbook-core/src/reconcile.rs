//! # Edit-Mode Reconciliation
//!
//! Rebuilds an editable draft from a stored purchase.
//!
//! ## Recovering the Manual Difference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stored record has no "difference" column:                              │
//! │                                                                         │
//! │    invoice_value = basic + cgst + sgst + igst + difference              │
//! │                                                                         │
//! │  so on load:                                                            │
//! │                                                                         │
//! │    difference = invoice_value - (basic + cgst + sgst + igst)            │
//! │                                                                         │
//! │  Rounding each stored amount separately means the recovered value can   │
//! │  be off by one paisa from what was typed. That drift is accepted.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::dates::{canonical_to_compact, entry_date_from_timestamp};
use crate::draft::PurchaseDraft;
use crate::money::Money;
use crate::types::{PurchaseEntry, Supplier, TaxRate};

/// Recovers the manual difference folded into a stored invoice value.
pub fn recover_manual_difference(record: &PurchaseEntry) -> Money {
    record.invoice_value - (record.basic_value + record.total_gst())
}

/// An edit-mode draft plus what could not be carried over from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefill {
    pub draft: PurchaseDraft,
    /// The stored `entry_date` when it does not begin with a `YYYY-MM-DD`
    /// date. The draft's entry date is `today` in that case.
    pub unreadable_entry_date: Option<String>,
}

/// Builds an edit-mode draft from a stored record.
///
/// Every field is reconciled independently: an unreadable `entry_date`
/// only costs the entry date, never the supplier, invoice or amounts.
/// The supplier's display name comes from `suppliers`; it is blank when
/// the list does not contain the supplier (or has not loaded). The part
/// selection is always cleared because parts are not stored per purchase.
pub fn prefill_from_record(
    record: &PurchaseEntry,
    suppliers: &[Supplier],
    today: NaiveDate,
) -> Prefill {
    let parsed_entry_date = entry_date_from_timestamp(&record.entry_date, today);
    let unreadable_entry_date = match parsed_entry_date {
        Some(_) => None,
        None => Some(record.entry_date.clone()),
    };

    let supplier_search = suppliers
        .iter()
        .find(|s| s.id == record.supplier_id)
        .map(|s| s.name.clone())
        .unwrap_or_default();

    let narration = record.narration.clone().unwrap_or_default();

    let draft = PurchaseDraft {
        entry_date: parsed_entry_date.unwrap_or(today),
        supplier_id: Some(record.supplier_id),
        supplier_search,
        invoice_no: record.invoice_no.clone(),
        invoice_date: canonical_to_compact(&record.date),
        gst_rate: TaxRate::from_percentage(record.gst_rate),
        assessable_value: record.basic_value.to_decimal(),
        manual_difference: recover_manual_difference(record).to_decimal(),
        part: None,
        part_query: String::new(),
        narration_touched: !narration.is_empty(),
        narration,
    };

    Prefill {
        draft,
        unreadable_entry_date,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::EntryContext;
    use crate::submission::build_create_payload;
    use crate::tax::HomeState;
    use crate::types::PurchaseCreate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn suppliers() -> Vec<Supplier> {
        vec![
            Supplier {
                id: 1,
                name: "Sri Murugan Traders".to_string(),
                gst_no: Some("33AAACT2727Q1ZW".to_string()),
                state_code: None,
                tds_flag: false,
                tds_rate: None,
                contact: None,
                email: None,
            },
            Supplier {
                id: 2,
                name: "Kaveri Steels".to_string(),
                gst_no: Some("29AAACK1111Q1ZX".to_string()),
                state_code: None,
                tds_flag: true,
                tds_rate: Some(1.0),
                contact: None,
                email: None,
            },
        ]
    }

    fn stored(payload: PurchaseCreate, id: i64) -> PurchaseEntry {
        PurchaseEntry {
            id,
            supplier_id: payload.supplier_id,
            invoice_no: payload.invoice_no,
            date: payload.date,
            entry_date: payload.entry_date.unwrap_or_default(),
            gst_rate: payload.gst_rate,
            basic_value: payload.basic_value,
            sgst: payload.sgst,
            cgst: payload.cgst,
            igst: payload.igst,
            invoice_value: payload.invoice_value,
            tds_value: payload.tds_value,
            narration: payload.narration,
            status: payload.status,
        }
    }

    fn record() -> PurchaseEntry {
        PurchaseEntry {
            id: 12,
            supplier_id: 1,
            invoice_no: "INV-9".to_string(),
            date: "2024-03-05".to_string(),
            entry_date: "2024-03-06 00:00:00".to_string(),
            gst_rate: 18.0,
            basic_value: Money::from_paise(100000),
            sgst: Money::from_paise(9000),
            cgst: Money::from_paise(9000),
            igst: Money::zero(),
            invoice_value: Money::from_paise(117960),
            tds_value: Money::zero(),
            narration: None,
            status: "uploaded".to_string(),
        }
    }

    #[test]
    fn test_recover_manual_difference() {
        assert_eq!(recover_manual_difference(&record()), Money::from_paise(-40));
    }

    #[test]
    fn test_prefill_copies_fields() {
        let draft = prefill_from_record(&record(), &suppliers(), today()).draft;
        assert_eq!(draft.entry_date(), NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(draft.supplier_id(), Some(1));
        assert_eq!(draft.supplier_search(), "Sri Murugan Traders");
        assert_eq!(draft.invoice_date(), "05-03-24");
        assert_eq!(draft.gst_rate(), TaxRate::from_bps(1800));
        assert_eq!(draft.assessable_value(), dec!(1000));
        assert_eq!(draft.manual_difference(), dec!(-0.40));
        assert!(draft.part().is_none());
        assert!(!draft.is_narration_touched());
    }

    #[test]
    fn test_prefill_stored_narration_is_sticky() {
        let rec = PurchaseEntry {
            narration: Some("Opening stock".to_string()),
            ..record()
        };
        let list = suppliers();
        let draft = prefill_from_record(&rec, &list, today()).draft;
        assert!(draft.is_narration_touched());

        let home = HomeState::default();
        let ctx = EntryContext::new(&list, &home);
        assert_eq!(draft.narration(&ctx), "Opening stock");
    }

    #[test]
    fn test_prefill_with_unloaded_suppliers() {
        let draft = prefill_from_record(&record(), &[], today()).draft;
        assert_eq!(draft.supplier_search(), "");
        assert_eq!(draft.supplier_id(), Some(1));
    }

    #[test]
    fn test_prefill_empty_entry_date_uses_today() {
        let rec = PurchaseEntry {
            entry_date: String::new(),
            ..record()
        };
        let prefill = prefill_from_record(&rec, &[], today());
        assert_eq!(prefill.draft.entry_date(), today());
        assert_eq!(prefill.unreadable_entry_date, None);
    }

    #[test]
    fn test_unreadable_entry_date_keeps_other_fields() {
        let rec = PurchaseEntry {
            entry_date: "2024-3-5 10:00:00".to_string(),
            ..record()
        };
        let prefill = prefill_from_record(&rec, &suppliers(), today());
        assert_eq!(
            prefill.unreadable_entry_date.as_deref(),
            Some("2024-3-5 10:00:00")
        );

        let draft = prefill.draft;
        assert_eq!(draft.entry_date(), today());
        assert_eq!(draft.supplier_id(), Some(1));
        assert_eq!(draft.supplier_search(), "Sri Murugan Traders");
        assert_eq!(draft.invoice_no(), "INV-9");
        assert_eq!(draft.invoice_date(), "05-03-24");
        assert_eq!(draft.assessable_value(), dec!(1000));
        assert_eq!(draft.manual_difference(), dec!(-0.40));
    }

    proptest! {
        #[test]
        fn prop_difference_survives_round_trip(
            assessable_paise in 0i64..10_000_000,
            diff_paise in -100_000i64..100_000,
            gst_bps in prop::sample::select(vec![0u32, 500, 1200, 1800, 2800, 1250, 333]),
            supplier_idx in 0usize..2,
        ) {
            let list = suppliers();
            let home = HomeState::default();
            let ctx = EntryContext::new(&list, &home);

            let mut draft = PurchaseDraft::new(today());
            draft.select_supplier(&list[supplier_idx]);
            draft.set_invoice_date("05-03-24");
            draft.set_gst_rate(TaxRate::from_bps(gst_bps));
            draft.set_assessable_value(Decimal::new(assessable_paise, 2));
            draft.set_manual_difference(Decimal::new(diff_paise, 2));

            let payload = build_create_payload(&draft, &ctx).unwrap();
            let back = prefill_from_record(&stored(payload, 1), &list, today()).draft;

            let drift = (back.manual_difference() - draft.manual_difference()).abs();
            prop_assert!(drift <= dec!(0.01), "drift {} too large", drift);
            prop_assert_eq!(back.assessable_value(), draft.assessable_value());
            prop_assert_eq!(back.gst_rate(), draft.gst_rate());
            prop_assert_eq!(back.invoice_date(), "05-03-24");
        }
    }
}
