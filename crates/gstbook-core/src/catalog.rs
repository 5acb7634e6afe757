//! # Catalog & Supplier Suggestions
//!
//! Filtering for the two type-ahead fields on the purchase form. The
//! item master itself lives elsewhere; this module only narrows what the
//! search returns.
//!
//! ```text
//! part query ──► search() ──► preferred_for_supplier() ──► first N
//! supplier text ──► suggest_suppliers() ──────────────────► first N
//! ```

use crate::types::{CatalogItem, Supplier};

/// Case-insensitive substring search over part number and description.
///
/// The query is trimmed first; an empty query matches everything.
pub fn search<'a>(items: &'a [CatalogItem], query: &str) -> Vec<&'a CatalogItem> {
    let q = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            q.is_empty()
                || item
                    .part_no
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&q)
                || item.description.to_lowercase().contains(&q)
        })
        .collect()
}

/// Keeps only items whose preferred supplier is `supplier_id`.
///
/// With no supplier selected the candidates are returned as-is.
pub fn preferred_for_supplier<'a>(
    candidates: Vec<&'a CatalogItem>,
    supplier_id: Option<i64>,
) -> Vec<&'a CatalogItem> {
    match supplier_id {
        Some(id) => candidates
            .into_iter()
            .filter(|item| item.supplier_id == Some(id))
            .collect(),
        None => candidates,
    }
}

/// Part suggestions for the dropdown: search, narrow, truncate.
pub fn suggest_parts<'a>(
    items: &'a [CatalogItem],
    query: &str,
    supplier_id: Option<i64>,
    limit: usize,
) -> Vec<&'a CatalogItem> {
    let mut found = preferred_for_supplier(search(items, query), supplier_id);
    found.truncate(limit);
    found
}

/// Supplier suggestions: case-insensitive substring match on the name,
/// in list order, at most `limit`.
pub fn suggest_suppliers<'a>(
    suppliers: &'a [Supplier],
    text: &str,
    limit: usize,
) -> Vec<&'a Supplier> {
    let needle = text.to_lowercase();
    suppliers
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, part_no: Option<&str>, description: &str, supplier_id: Option<i64>) -> CatalogItem {
        CatalogItem {
            id,
            part_no: part_no.map(str::to_string),
            description: description.to_string(),
            gst_percent: Some(18.0),
            supplier_id,
            active: true,
        }
    }

    fn supplier(id: i64, name: &str) -> Supplier {
        Supplier {
            id,
            name: name.to_string(),
            gst_no: None,
            state_code: None,
            tds_flag: false,
            tds_rate: None,
            contact: None,
            email: None,
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item(1, Some("BRG-6204"), "Ball bearing", Some(10)),
            item(2, Some("BLT-M8"), "Hex bolt M8", Some(11)),
            item(3, None, "Bearing grease", Some(10)),
            item(4, Some("WSH-8"), "Washer", None),
        ]
    }

    #[test]
    fn test_search_matches_part_no_or_description() {
        let items = catalog();
        let ids: Vec<i64> = search(&items, "  BEAR ").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<i64> = search(&items, "blt").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let items = catalog();
        assert_eq!(search(&items, "   ").len(), 4);
    }

    #[test]
    fn test_suggestions_narrow_to_supplier() {
        let items = catalog();
        let ids: Vec<i64> = suggest_parts(&items, "", Some(10), 6).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<i64> = suggest_parts(&items, "", None, 2).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_supplier_suggestions() {
        let suppliers = vec![
            supplier(1, "Sri Murugan Traders"),
            supplier(2, "Kaveri Steels"),
            supplier(3, "Murugan Hardware"),
        ];
        let ids: Vec<i64> = suggest_suppliers(&suppliers, "murugan", 6)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(suggest_suppliers(&suppliers, "", 2).len(), 2);
        assert!(suggest_suppliers(&[], "x", 6).is_empty());
    }
}
