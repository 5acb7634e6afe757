//! In-memory command layer.
//!
//! Behaves like the native store for everything the purchase form can
//! observe: ids are assigned sequentially, updates only touch the fields
//! they carry, supplier pages honour the clamp rules.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Local;

use gstbook_core::catalog;
use gstbook_core::dates::format_entry_timestamp;
use gstbook_core::types::{
    CatalogItem, Page, PurchaseCreate, PurchaseEntry, PurchaseItemPayload, PurchaseUpdate,
    Supplier, SupplierQuery,
};

use super::PurchaseBackend;
use crate::error::{BackendError, BackendResult};

#[derive(Debug, Default)]
struct Store {
    suppliers: Vec<Supplier>,
    items: Vec<CatalogItem>,
    purchases: Vec<PurchaseEntry>,
    purchase_items: HashMap<i64, Vec<PurchaseItemPayload>>,
    next_id: i64,
}

/// A [`PurchaseBackend`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new(suppliers: Vec<Supplier>, items: Vec<CatalogItem>) -> Self {
        InMemoryBackend {
            store: Mutex::new(Store {
                suppliers,
                items,
                next_id: 1,
                ..Store::default()
            }),
        }
    }

    fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Returns a stored purchase.
    pub fn purchase(&self, id: i64) -> Option<PurchaseEntry> {
        self.with_store(|s| s.purchases.iter().find(|p| p.id == id).cloned())
    }

    /// Returns the line items stored with a purchase.
    pub fn purchase_items(&self, id: i64) -> Vec<PurchaseItemPayload> {
        self.with_store(|s| s.purchase_items.get(&id).cloned().unwrap_or_default())
    }

    /// Number of stored purchases.
    pub fn purchase_count(&self) -> usize {
        self.with_store(|s| s.purchases.len())
    }
}

fn ensure_supplier(store: &Store, supplier_id: i64) -> BackendResult<()> {
    if store.suppliers.iter().any(|s| s.id == supplier_id) {
        Ok(())
    } else {
        Err(BackendError::NotFound {
            entity: "Supplier".to_string(),
            id: supplier_id.to_string(),
        })
    }
}

#[async_trait]
impl PurchaseBackend for InMemoryBackend {
    async fn add_purchase(&self, payload: PurchaseCreate) -> BackendResult<PurchaseEntry> {
        self.with_store(|store| {
            ensure_supplier(store, payload.supplier_id)?;

            let id = store.next_id.max(1);
            store.next_id = id + 1;

            let entry = PurchaseEntry {
                id,
                supplier_id: payload.supplier_id,
                invoice_no: payload.invoice_no,
                date: payload.date,
                entry_date: payload
                    .entry_date
                    .unwrap_or_else(|| format_entry_timestamp(Local::now().date_naive())),
                gst_rate: payload.gst_rate,
                basic_value: payload.basic_value,
                sgst: payload.sgst,
                cgst: payload.cgst,
                igst: payload.igst,
                invoice_value: payload.invoice_value,
                tds_value: payload.tds_value,
                narration: payload.narration,
                status: payload.status,
            };

            store.purchase_items.insert(id, payload.items);
            store.purchases.push(entry.clone());
            Ok(entry)
        })
    }

    async fn update_purchase(&self, payload: PurchaseUpdate) -> BackendResult<PurchaseEntry> {
        self.with_store(|store| {
            if let Some(supplier_id) = payload.supplier_id {
                ensure_supplier(store, supplier_id)?;
            }

            let entry = store
                .purchases
                .iter_mut()
                .find(|p| p.id == payload.id)
                .ok_or_else(|| BackendError::NotFound {
                    entity: "Purchase".to_string(),
                    id: payload.id.to_string(),
                })?;

            if let Some(v) = payload.supplier_id {
                entry.supplier_id = v;
            }
            if let Some(v) = payload.invoice_no {
                entry.invoice_no = v;
            }
            if let Some(v) = payload.date {
                entry.date = v;
            }
            if let Some(v) = payload.entry_date {
                entry.entry_date = v;
            }
            if let Some(v) = payload.gst_rate {
                entry.gst_rate = v;
            }
            if let Some(v) = payload.basic_value {
                entry.basic_value = v;
            }
            if let Some(v) = payload.sgst {
                entry.sgst = v;
            }
            if let Some(v) = payload.cgst {
                entry.cgst = v;
            }
            if let Some(v) = payload.igst {
                entry.igst = v;
            }
            if let Some(v) = payload.invoice_value {
                entry.invoice_value = v;
            }
            if let Some(v) = payload.tds_value {
                entry.tds_value = v;
            }
            if let Some(v) = payload.narration {
                entry.narration = Some(v);
            }
            if let Some(v) = payload.status {
                entry.status = v;
            }

            let updated = entry.clone();
            if let Some(items) = payload.items {
                store.purchase_items.insert(payload.id, items);
            }
            Ok(updated)
        })
    }

    async fn get_suppliers(&self, query: SupplierQuery) -> BackendResult<Page<Supplier>> {
        let query = query.clamped();
        self.with_store(|store| {
            let needle = query
                .name_filter
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_lowercase);

            let matching: Vec<&Supplier> = store
                .suppliers
                .iter()
                .filter(|s| match &needle {
                    Some(n) => s.name.to_lowercase().contains(n.as_str()),
                    None => true,
                })
                .collect();

            let total = matching.len() as i64;
            let data = matching
                .into_iter()
                .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
                .take(query.page_size as usize)
                .cloned()
                .collect();

            Ok(Page {
                data,
                total,
                page: query.page,
                page_size: query.page_size,
            })
        })
    }

    async fn search_items(&self, query: &str) -> BackendResult<Vec<CatalogItem>> {
        self.with_store(|store| {
            Ok(catalog::search(&store.items, query)
                .into_iter()
                .filter(|item| item.active)
                .cloned()
                .collect())
        })
    }
}
