//! Application state definitions

use super::forms::{FormServices, PaymentForm};
use chrono::{DateTime, Local};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Card entry form
    #[default]
    Payment,
    /// Landing page after a saved payment
    Activities,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::Activities => "Activities",
        }
    }
}

/// Navigation targets reachable through a `Navigator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Activities,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Activities => "/activities",
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Activities => View::Activities,
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    pub current_view: View,
    /// Present while the payment view is mounted
    pub payment_form: Option<PaymentForm>,
    /// When the last payment was saved
    pub saved_at: Option<DateTime<Local>>,
}

impl AppState {
    /// Mount a fresh payment form, discarding any previous draft
    pub fn open_payment_form(&mut self, services: FormServices) {
        self.payment_form = Some(PaymentForm::new(services));
        self.current_view = View::Payment;
    }

    /// Switch to the route's view. Every route leaves the payment view, so
    /// the form is torn down, which also cancels any redirect it still has
    /// pending.
    pub fn navigate(&mut self, route: Route) {
        self.payment_form = None;
        self.current_view = route.view();
    }
}
