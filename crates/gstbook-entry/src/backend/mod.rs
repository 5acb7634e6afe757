//! # Backend Module
//!
//! The interface to the native command layer that stores purchases.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PurchaseEntrySession                                                   │
//! │         │  Arc<dyn PurchaseBackend>                                     │
//! │         ▼                                                               │
//! │  ┌──────────────────────┐      ┌──────────────────────────────────┐     │
//! │  │ IPC bridge (app)     │  or  │ InMemoryBackend (tests, offline) │     │
//! │  └──────────────────────┘      └──────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod memory;

pub use memory::InMemoryBackend;

use async_trait::async_trait;

use gstbook_core::types::{
    CatalogItem, Page, PurchaseCreate, PurchaseEntry, PurchaseUpdate, Supplier, SupplierQuery,
};

use crate::error::BackendResult;

/// The four commands the purchase form needs.
#[async_trait]
pub trait PurchaseBackend: Send + Sync {
    /// Stores a new purchase and returns the stored record.
    async fn add_purchase(&self, payload: PurchaseCreate) -> BackendResult<PurchaseEntry>;

    /// Applies a partial update. Absent `items` keeps the stored items.
    async fn update_purchase(&self, payload: PurchaseUpdate) -> BackendResult<PurchaseEntry>;

    /// Returns one page of suppliers, optionally filtered by name.
    async fn get_suppliers(&self, query: SupplierQuery) -> BackendResult<Page<Supplier>>;

    /// Searches the item master by part number or description.
    async fn search_items(&self, query: &str) -> BackendResult<Vec<CatalogItem>>;
}
