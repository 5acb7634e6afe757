//! Cache of the last loaded supplier page.

use std::sync::{Arc, PoisonError, RwLock};

use gstbook_core::Supplier;

/// Suppliers as last returned by `get_suppliers`. Empty until loaded.
#[derive(Debug, Clone, Default)]
pub struct SupplierCache {
    suppliers: Arc<RwLock<Vec<Supplier>>>,
}

impl SupplierCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached list.
    pub fn replace(&self, suppliers: Vec<Supplier>) {
        let mut guard = self.suppliers.write().unwrap_or_else(PoisonError::into_inner);
        *guard = suppliers;
    }

    /// Executes a function with read access to the list.
    pub fn with_suppliers<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Supplier]) -> R,
    {
        let guard = self.suppliers.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_replace_swaps_whole_list() {
        let cache = SupplierCache::new();
        assert!(cache.with_suppliers(|s| s.is_empty()));

        cache.replace(vec![supplier(1, "A"), supplier(2, "B")]);
        let shared = cache.clone();
        shared.replace(vec![supplier(3, "C")]);

        let ids: Vec<i64> = cache.with_suppliers(|s| s.iter().map(|x| x.id).collect());
        assert_eq!(ids, vec![3]);
    }
}
