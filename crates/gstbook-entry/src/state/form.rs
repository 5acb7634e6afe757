//! # Form State
//!
//! The purchase form being edited.
//!
//! ## Thread Safety
//! The form is wrapped in `Arc<Mutex<T>>` because the frontend may fire
//! several input events while a submission is awaiting the command layer.
//! Each access is a short closure, so the lock is never held across an
//! await point.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gstbook_core::{LastEntry, PurchaseDraft, SubmitMode};

/// Everything the form remembers between events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryForm {
    pub mode: SubmitMode,
    pub draft: PurchaseDraft,
    /// Set after each successful create; survives resets.
    pub last_entry: Option<LastEntry>,
}

impl EntryForm {
    /// A blank create form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        EntryForm {
            mode: SubmitMode::Create,
            draft: PurchaseDraft::new(today),
            last_entry: None,
        }
    }
}

/// Shared handle to the form.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Arc<Mutex<EntryForm>>,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        FormState {
            form: Arc::new(Mutex::new(EntryForm::new(today))),
        }
    }

    /// Executes a function with read access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let mode = form_state.with_form(|f| f.mode);
    /// ```
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EntryForm) -> R,
    {
        let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&form)
    }

    /// Executes a function with write access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// form_state.with_form_mut(|f| f.draft.set_invoice_no("INV-1"));
    /// ```
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut EntryForm) -> R,
    {
        let mut form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_new_form_is_blank_create() {
        let state = FormState::new(today());
        state.with_form(|f| {
            assert_eq!(f.mode, SubmitMode::Create);
            assert_eq!(f.draft, PurchaseDraft::new(today()));
            assert!(f.last_entry.is_none());
        });
    }

    #[test]
    fn test_clones_share_the_same_form() {
        let state = FormState::new(today());
        let other = state.clone();
        other.with_form_mut(|f| f.draft.set_invoice_no("INV-77"));
        assert_eq!(state.with_form(|f| f.draft.invoice_no().to_string()), "INV-77");
    }
}
