//! Payment form controller

use super::draft::{validate, PaymentDraft, PaymentField, PaymentRecord};
use super::error::FormError;
use super::redirect::{PendingRedirect, REDIRECT_DELAY};
use crate::backend::{AuthProvider, Navigator, PaymentStore};
use crate::state::Route;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Where a submission stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    /// Failed a check before anything was sent
    Rejected,
    /// Insert outstanding
    Submitting,
    /// Insert reported an error
    Failed,
    /// Saved, redirect pending
    Persisted,
}

/// Collaborators the form is wired to
#[derive(Clone)]
pub struct FormServices {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn PaymentStore>,
    pub navigator: Arc<dyn Navigator>,
}

/// Card entry form: owns the draft and the submission lifecycle
pub struct PaymentForm {
    pub draft: PaymentDraft,
    pub active_field_index: usize,
    phase: SubmitPhase,
    error: Option<FormError>,
    success: bool,
    services: FormServices,
    redirect_delay: Duration,
    pending_redirect: Option<PendingRedirect>,
}

impl PaymentForm {
    /// Index of the submit button in the focus order
    pub const SUBMIT_INDEX: usize = PaymentField::ALL.len();

    pub fn new(services: FormServices) -> Self {
        Self {
            draft: PaymentDraft::new(),
            active_field_index: 0,
            phase: SubmitPhase::Idle,
            error: None,
            success: false,
            services,
            redirect_delay: REDIRECT_DELAY,
            pending_redirect: None,
        }
    }

    /// Store a raw input value, applying the field's digit rules
    pub fn update_field(&mut self, field: PaymentField, raw: &str) {
        self.draft.field_mut(field).set_text(raw);
    }

    pub fn error(&self) -> Option<FormError> {
        self.error
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// True while the insert is outstanding
    pub fn is_busy(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn can_submit(&self) -> bool {
        !matches!(self.phase, SubmitPhase::Submitting | SubmitPhase::Persisted)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            "Processing..."
        } else {
            "Pay Now"
        }
    }

    pub fn has_pending_redirect(&self) -> bool {
        self.pending_redirect
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// The store inserts go to
    pub fn store(&self) -> Arc<dyn PaymentStore> {
        Arc::clone(&self.services.store)
    }

    /// Validate and mark the form busy. Returns the record to insert, or
    /// `None` when the submit was ignored or rejected (see [`Self::error`]).
    pub fn begin_submit(&mut self) -> Option<PaymentRecord> {
        if !self.can_submit() {
            tracing::debug!(phase = ?self.phase, "submit ignored");
            return None;
        }

        match validate(self.services.auth.current_user(), &self.draft) {
            Ok(record) => {
                self.phase = SubmitPhase::Submitting;
                self.error = None;
                Some(record)
            }
            Err(e) => {
                tracing::debug!("payment form rejected: {e:?}");
                self.phase = SubmitPhase::Rejected;
                self.error = Some(e);
                None
            }
        }
    }

    /// Apply the insert outcome. On success the redirect is scheduled.
    pub fn finish_submit(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                tracing::info!("payment details saved");
                self.phase = SubmitPhase::Persisted;
                self.success = true;
                self.pending_redirect = Some(PendingRedirect::schedule(
                    Arc::clone(&self.services.navigator),
                    Route::Activities,
                    self.redirect_delay,
                ));
            }
            Err(e) => {
                tracing::error!("Failed to save payment details: {e:#}");
                self.phase = SubmitPhase::Failed;
                self.error = Some(FormError::PersistenceFailure);
            }
        }
    }

    /// The focused input, if focus is not on the submit button
    pub fn active_payment_field(&self) -> Option<PaymentField> {
        PaymentField::from_index(self.active_field_index)
    }

    pub fn is_submit_focused(&self) -> bool {
        self.active_field_index == Self::SUBMIT_INDEX
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.active_payment_field() {
            let mut raw = self.draft.field(field).as_text().to_string();
            raw.push(c);
            self.update_field(field, &raw);
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        if let Some(field) = self.active_payment_field() {
            let mut raw = self.draft.field(field).as_text().to_string();
            raw.pop();
            self.update_field(field, &raw);
        }
    }
}

impl Form for PaymentForm {
    fn field_count(&self) -> usize {
        PaymentField::ALL.len() + 1 // inputs, submit button
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(Self::SUBMIT_INDEX);
    }
}
