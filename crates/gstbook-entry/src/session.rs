//! # Purchase Entry Session
//!
//! One open purchase form: its draft, the supplier list it was built
//! against, and the command layer it submits to.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Entry Session                               │
//! │                                                                         │
//! │  new() ──► load_suppliers() ──► edit(|draft| ...) ──► submit()          │
//! │                 │                  │  debug! snapshot       │           │
//! │                 │                  │  on every change       │           │
//! │                 ▼                  ▼                        ▼           │
//! │          SupplierCache        FormState            ┌───────────────┐    │
//! │                                                    │ pending flag  │    │
//! │  begin_edit(record) ──► prefill ──► Update mode    │ second submit │    │
//! │        │ entry date unreadable                     │ is rejected   │    │
//! │        └──► warn! + today, other fields kept       └───────┬───────┘    │
//! │                                                            │            │
//! │                  ┌─────────────────────────────────────────┤            │
//! │                  ▼ ok (create)                             ▼ err        │
//! │       snapshot → last_entry                          error!, draft kept │
//! │       reset_after_create()                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! The supplier cache is always locked before the form. No lock is held
//! across the backend call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gstbook_core::catalog;
use gstbook_core::reconcile::prefill_from_record;
use gstbook_core::submission::build_payload;
use gstbook_core::validation::validate_search_query;
use gstbook_core::{
    CatalogItem, EntryContext, HomeState, PurchaseDraft, PurchaseEntry, PurchasePayload,
    SubmitMode, SubmitReadiness, Supplier, SupplierQuery, TaxBreakdown, ValidationError,
};

use crate::backend::PurchaseBackend;
use crate::config::EntryConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::{FormState, SupplierCache};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Form View
// =============================================================================

/// Everything the frontend renders for the form, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub mode: SubmitMode,
    pub draft: PurchaseDraft,
    pub supplier_name: Option<String>,
    pub supplier_gst_no: Option<String>,
    pub is_home_state: bool,
    pub breakdown: TaxBreakdown,
    /// The narration that would be submitted now.
    pub narration: String,
    pub readiness: SubmitReadiness,
    pub submitting: bool,
    pub can_duplicate: bool,
}

// =============================================================================
// Submit Guard
// =============================================================================

/// Holds the pending flag for the lifetime of one submission.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// Session
// =============================================================================

/// A purchase-entry form bound to a command layer.
pub struct PurchaseEntrySession {
    id: Uuid,
    backend: Arc<dyn PurchaseBackend>,
    config: EntryConfig,
    home_state: HomeState,
    suppliers: SupplierCache,
    form: FormState,
    submitting: AtomicBool,
}

impl PurchaseEntrySession {
    /// Opens a blank create form dated today.
    pub fn new(backend: Arc<dyn PurchaseBackend>, config: EntryConfig) -> Self {
        let id = Uuid::new_v4();
        let home_state = config.home_state();
        info!(session = %id, home_state = %home_state.code(), "Purchase entry session opened");

        PurchaseEntrySession {
            id,
            backend,
            home_state,
            config,
            suppliers: SupplierCache::new(),
            form: FormState::new(today()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Correlation id used in every log line of this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    /// True while a submission is awaiting the command layer.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Loads the first page of suppliers into the cache.
    ///
    /// ## Returns
    /// The total number of suppliers matching `name_filter`.
    pub async fn load_suppliers(&self, name_filter: Option<String>) -> ApiResult<i64> {
        let query = SupplierQuery {
            name_filter,
            ..SupplierQuery::first_page(self.config.supplier_page_size)
        };
        debug!(session = %self.id, ?query, "Loading suppliers");

        let page = self.backend.get_suppliers(query).await.map_err(|e| {
            warn!(session = %self.id, error = %e, "Supplier load failed");
            ApiError::from(e)
        })?;

        info!(session = %self.id, loaded = page.data.len(), total = page.total, "Suppliers loaded");
        let total = page.total;
        self.suppliers.replace(page.data);
        Ok(total)
    }

    /// Returns the cached suppliers.
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.suppliers.with_suppliers(|s| s.to_vec())
    }

    /// Suppliers matching the current supplier search text.
    pub fn supplier_suggestions(&self) -> Vec<Supplier> {
        let text = self.form.with_form(|f| f.draft.supplier_search().to_string());
        self.suppliers.with_suppliers(|list| {
            catalog::suggest_suppliers(list, &text, self.config.suggestion_limit)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Catalog items matching the current part query, narrowed to the
    /// selected supplier.
    pub async fn part_suggestions(&self) -> ApiResult<Vec<CatalogItem>> {
        let (raw_query, supplier_id) = self
            .form
            .with_form(|f| (f.draft.part_query().to_string(), f.draft.supplier_id()));
        let query = validate_search_query(&raw_query)?;

        let items = self.backend.search_items(&query).await?;
        let suggestions: Vec<CatalogItem> =
            catalog::suggest_parts(&items, &query, supplier_id, self.config.suggestion_limit)
                .into_iter()
                .cloned()
                .collect();

        debug!(
            session = %self.id,
            query = %query,
            ?supplier_id,
            found = items.len(),
            shown = suggestions.len(),
            "Part suggestions"
        );
        Ok(suggestions)
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Applies a change to the draft and logs the resulting snapshot.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.edit(|d| d.set_assessable_text("1000"));
    /// ```
    pub fn edit<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PurchaseDraft) -> R,
    {
        let result = self.form.with_form_mut(|form| f(&mut form.draft));
        self.log_snapshot();
        result
    }

    /// Selects a supplier from the loaded list by id.
    pub fn select_supplier(&self, supplier_id: i64) -> ApiResult<()> {
        let supplier = self
            .suppliers
            .with_suppliers(|list| list.iter().find(|s| s.id == supplier_id).cloned())
            .ok_or_else(|| ApiError::not_found("Supplier", &supplier_id.to_string()))?;

        self.edit(|d| d.select_supplier(&supplier));
        Ok(())
    }

    /// Selects the first supplier matching the search text (Enter key).
    pub fn accept_first_supplier(&self) -> bool {
        let suppliers = self.suppliers();
        self.edit(|d| d.accept_first_supplier_match(&suppliers))
    }

    /// Selects a catalog item as the part.
    pub fn select_part(&self, item: &CatalogItem) {
        self.edit(|d| d.select_part(item));
    }

    /// Restores supplier, GST rate and part from the last created entry.
    ///
    /// Returns false when nothing has been created yet in this session.
    pub fn duplicate_last_entry(&self) -> bool {
        let applied = self.form.with_form_mut(|form| match &form.last_entry {
            Some(last) => {
                form.draft.apply_last_entry(last);
                true
            }
            None => false,
        });
        if applied {
            self.log_snapshot();
        }
        applied
    }

    /// Switches to a blank create form dated today.
    pub fn begin_create(&self) {
        self.form.with_form_mut(|form| {
            form.mode = SubmitMode::Create;
            form.draft = PurchaseDraft::new(today());
        });
        self.log_snapshot();
    }

    /// Loads a stored purchase into the form for editing.
    ///
    /// An unreadable stored entry date is logged and replaced by today;
    /// every other field is still loaded from the record.
    pub fn begin_edit(&self, record: &PurchaseEntry) {
        let prefill = self
            .suppliers
            .with_suppliers(|list| prefill_from_record(record, list, today()));
        if let Some(raw) = &prefill.unreadable_entry_date {
            warn!(
                session = %self.id,
                purchase_id = record.id,
                entry_date = %raw,
                "Stored entry date unreadable, using today"
            );
        }
        let draft = prefill.draft;

        self.form.with_form_mut(|form| {
            form.mode = SubmitMode::Update { id: record.id };
            form.draft = draft;
        });
        info!(session = %self.id, purchase_id = record.id, "Editing purchase");
        self.log_snapshot();
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Computes the current view of the form.
    pub fn view(&self) -> FormView {
        let submitting = self.is_submitting();
        self.suppliers.with_suppliers(|list| {
            let ctx = EntryContext::new(list, &self.home_state);
            self.form.with_form(|form| {
                let supplier = ctx.supplier(form.draft.supplier_id());
                let profile = ctx.profile(form.draft.supplier_id());
                FormView {
                    mode: form.mode,
                    draft: form.draft.clone(),
                    supplier_name: supplier.map(|s| s.name.clone()),
                    supplier_gst_no: supplier.and_then(|s| s.gst_no.clone()),
                    is_home_state: profile.is_home_state,
                    breakdown: form.draft.breakdown(&ctx),
                    narration: form.draft.narration(&ctx),
                    readiness: SubmitReadiness::for_draft(&form.draft, form.mode),
                    submitting,
                    can_duplicate: form.last_entry.is_some(),
                }
            })
        })
    }

    fn log_snapshot(&self) {
        let view = self.view();
        let d = &view.draft;
        let b = &view.breakdown;
        debug!(
            session = %self.id,
            mode = ?view.mode,
            entry_date = %d.entry_date(),
            supplier_id = ?d.supplier_id(),
            supplier_name = ?view.supplier_name,
            supplier_gst = ?view.supplier_gst_no,
            is_home_state = view.is_home_state,
            invoice_no = %d.invoice_no(),
            invoice_date = %d.invoice_date(),
            part_query = %d.part_query(),
            gst_rate = %d.gst_rate().decimal_percentage(),
            assessable = %d.assessable_value(),
            difference = %d.manual_difference(),
            cgst = %b.cgst,
            sgst = %b.sgst,
            igst = %b.igst,
            tds = %b.tds,
            invoice_total = %b.invoice_total,
            narration = %view.narration,
            "Purchase form snapshot"
        );
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Sends the form to the command layer.
    ///
    /// ## Behavior
    /// - A second call while one is pending fails with `SUBMIT_IN_PROGRESS`
    /// - Validation failures return before anything is sent
    /// - On failure the draft is left exactly as it was
    /// - After a successful create the draft is reset (entry date kept) and
    ///   the supplier/part selection becomes the "last entry"
    /// - After a successful update the form returns to a blank create form
    pub async fn submit(&self) -> ApiResult<PurchaseEntry> {
        let _guard = SubmitGuard::acquire(&self.submitting).ok_or_else(|| {
            warn!(session = %self.id, "Submit ignored: already submitting");
            ApiError::submit_in_progress()
        })?;

        let (mode, payload, snapshot) = self.suppliers.with_suppliers(|list| {
            let ctx = EntryContext::new(list, &self.home_state);
            self.form.with_form(|form| {
                let payload = build_payload(&form.draft, &ctx, form.mode)?;
                Ok::<_, ValidationError>((form.mode, payload, form.draft.snapshot()))
            })
        })
        .map_err(|e| {
            debug!(session = %self.id, error = %e, "Submit rejected by validation");
            ApiError::from(e)
        })?;

        info!(session = %self.id, ?mode, "Submitting purchase");
        let result = match payload {
            PurchasePayload::Create(p) => self.backend.add_purchase(p).await,
            PurchasePayload::Update(p) => self.backend.update_purchase(p).await,
        };

        match result {
            Ok(entry) => {
                self.form.with_form_mut(|form| match mode {
                    SubmitMode::Create => {
                        form.last_entry = Some(snapshot);
                        form.draft.reset_after_create();
                    }
                    SubmitMode::Update { .. } => {
                        form.mode = SubmitMode::Create;
                        form.draft = PurchaseDraft::new(form.draft.entry_date());
                    }
                });
                info!(
                    session = %self.id,
                    purchase_id = entry.id,
                    invoice_value = %entry.invoice_value,
                    "Purchase saved"
                );
                Ok(entry)
            }
            Err(e) => {
                error!(session = %self.id, ?mode, error = %e, "Purchase submission failed");
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
