//! # State Module
//!
//! Shared state held by a purchase-entry session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FormState      Arc<Mutex<EntryForm>>   draft, mode, last entry         │
//! │  SupplierCache  Arc<RwLock<Vec<..>>>    last loaded supplier page       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither lock is ever held across an `.await`.

mod form;
mod suppliers;

pub use form::{EntryForm, FormState};
pub use suppliers::SupplierCache;
