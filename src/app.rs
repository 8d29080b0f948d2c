//! Application state and core logic

use crate::backend::{
    AuthProvider, JsonFileStore, Navigator, PaymentStore, RestPaymentStore, SessionAuth,
};
use crate::config::AppConfig;
use crate::state::{AppState, Form, FormServices, Route, View};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Completions reported back to the event loop by background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The payment insert resolved
    SubmitFinished(Result<()>),
    /// A scheduled navigation fired
    Navigate(Route),
}

/// Navigator that hands routes to the app event loop
pub struct ChannelNavigator {
    tx: UnboundedSender<AppEvent>,
}

impl ChannelNavigator {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.tx.send(AppEvent::Navigate(route)).is_err() {
            tracing::warn!(path = route.path(), "navigation dropped, event loop gone");
        }
    }
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Short description of where payments are stored
    pub store_label: String,
    services: FormServices,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App from the user's config and session
    pub fn new() -> Result<Self> {
        let config = AppConfig::load()?;
        let auth = SessionAuth::load()?;

        if auth.current_user().is_none() {
            tracing::warn!("No signed-in user, payments will be rejected");
        }

        let (store, store_label): (Arc<dyn PaymentStore>, &str) = match config.remote_store() {
            Some((url, api_key)) => {
                tracing::info!(url, "Using hosted payment table");
                let store: Arc<dyn PaymentStore> = Arc::new(RestPaymentStore::new(
                    url,
                    api_key,
                    config.payment_table.as_deref(),
                    auth.access_token().map(str::to_string),
                    config.request_timeout(),
                )?);
                (store, "hosted")
            }
            None => {
                let path = config.local_store_path();
                tracing::info!(path = %path.display(), "Using local payment store");
                let store: Arc<dyn PaymentStore> = Arc::new(JsonFileStore::new(path));
                (store, "local file")
            }
        };

        Ok(Self::with_services(Arc::new(auth), store, store_label))
    }

    /// Create an App wired to the given collaborators, with the payment
    /// form mounted
    pub fn with_services(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn PaymentStore>,
        store_label: &str,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let services = FormServices {
            auth,
            store,
            navigator: Arc::new(ChannelNavigator::new(events_tx.clone())),
        };

        let mut state = AppState::default();
        state.open_payment_form(services.clone());

        Self {
            state,
            store_label: store_label.to_string(),
            services,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.state.current_view {
            View::Payment => self.handle_payment_key(key),
            View::Activities => self.handle_activities_key(key),
        }
    }

    /// Handle keys in the Payment view
    fn handle_payment_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.quit = true;
            return;
        }

        let submit_shortcut = key.code == KeyCode::Char('s')
            && key.modifiers.contains(crate::platform::SUBMIT_MODIFIER);
        if key.code == KeyCode::Enter || submit_shortcut {
            self.submit_payment();
            return;
        }

        let Some(form) = self.state.payment_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                form.input_char(c)
            }
            _ => {}
        }
    }

    /// Handle keys in the Activities view
    fn handle_activities_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('n') => self.reset_payment_form(),
            _ => {}
        }
    }

    /// Validate the form and start the insert in the background. Field edits
    /// keep working while it runs.
    fn submit_payment(&mut self) {
        let Some(form) = self.state.payment_form.as_mut() else {
            return;
        };
        let Some(record) = form.begin_submit() else {
            return;
        };

        let store = form.store();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = store.insert(&record).await;
            let _ = tx.send(AppEvent::SubmitFinished(result));
        });
    }

    /// Apply a completion from a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SubmitFinished(result) => {
                let Some(form) = self.state.payment_form.as_mut() else {
                    tracing::debug!("insert finished after the payment form was closed");
                    return;
                };
                if result.is_ok() {
                    self.state.saved_at = Some(Local::now());
                }
                form.finish_submit(result);
            }
            AppEvent::Navigate(route) => {
                tracing::info!(path = route.path(), "navigating");
                self.state.navigate(route);
            }
        }
    }

    /// Take the next queued event without waiting
    pub fn try_next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Discard the current draft and show an empty payment form
    pub fn reset_payment_form(&mut self) {
        self.state.open_payment_form(self.services.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockAuthProvider, MockPaymentStore};
    use crate::state::{FormError, PaymentField, REDIRECT_DELAY};
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use uuid::Uuid;

    fn signed_in() -> Arc<dyn AuthProvider> {
        let mut auth = MockAuthProvider::new();
        auth.expect_current_user()
            .return_const(Some(Uuid::new_v4()));
        Arc::new(auth)
    }

    impl App {
        async fn next_event(&mut self) -> Option<AppEvent> {
            self.events_rx.recv().await
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App) {
        type_text(app, "Jane Doe");
        press(app, KeyCode::Tab);
        type_text(app, "4111 1111 1111 1111");
        press(app, KeyCode::Tab);
        type_text(app, "12/29");
        press(app, KeyCode::Tab);
        type_text(app, "123");
    }

    fn draft_value(app: &App, field: PaymentField) -> String {
        app.state
            .payment_form
            .as_ref()
            .map(|f| f.draft.field(field).as_text().to_string())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_starts_on_payment_view() {
        let app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        assert_eq!(app.state.current_view, View::Payment);
        assert!(app.state.payment_form.is_some());
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_typing_fills_fields() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        fill_form(&mut app);
        assert_eq!(draft_value(&app, PaymentField::Name), "Jane Doe");
        assert_eq!(draft_value(&app, PaymentField::CardNumber), "4111111111111111");
        assert_eq!(draft_value(&app, PaymentField::Expiry), "12/29");
        assert_eq!(draft_value(&app, PaymentField::Cvv), "123");
    }

    #[tokio::test]
    async fn test_control_chars_not_typed() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(draft_value(&app, PaymentField::Name), "");
    }

    #[tokio::test]
    async fn test_invalid_submit_shows_error_without_insert() {
        let mut store = MockPaymentStore::new();
        store.expect_insert().times(0);
        let mut app = App::with_services(signed_in(), Arc::new(store), "test");

        type_text(&mut app, "Jane Doe");
        press(&mut app, KeyCode::Enter);

        let form = app.state.payment_form.as_ref().unwrap();
        assert_eq!(form.error(), Some(FormError::MissingFields));
        assert!(app.try_next_event().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_payment_redirects_to_activities() {
        let mut store = MockPaymentStore::new();
        store
            .expect_insert()
            .withf(|record| record.card_last4 == "1111")
            .times(1)
            .returning(|_| Ok(()));
        let mut app = App::with_services(signed_in(), Arc::new(store), "test");

        fill_form(&mut app);
        press(&mut app, KeyCode::Enter);
        assert!(app.state.payment_form.as_ref().unwrap().is_busy());

        // Second press while the insert is outstanding is ignored
        press(&mut app, KeyCode::Enter);

        let event = app.next_event().await.unwrap();
        assert!(matches!(event, AppEvent::SubmitFinished(Ok(()))));
        app.handle_event(event);

        let form = app.state.payment_form.as_ref().unwrap();
        assert!(form.is_success());
        assert!(!form.is_busy());
        assert!(app.state.saved_at.is_some());
        assert_eq!(app.state.current_view, View::Payment);

        let started = tokio::time::Instant::now();
        let event = app.next_event().await.unwrap();
        assert!(started.elapsed() >= REDIRECT_DELAY);
        assert!(matches!(event, AppEvent::Navigate(Route::Activities)));
        app.handle_event(event);

        assert_eq!(app.state.current_view, View::Activities);
        assert!(app.state.payment_form.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_insert_shows_error_and_stays() {
        let mut store = MockPaymentStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(anyhow!("connection reset")));
        let mut app = App::with_services(signed_in(), Arc::new(store), "test");

        fill_form(&mut app);
        press(&mut app, KeyCode::Enter);
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        let form = app.state.payment_form.as_ref().unwrap();
        assert_eq!(form.error(), Some(FormError::PersistenceFailure));
        assert!(!form.is_success());
        assert!(app.state.saved_at.is_none());

        tokio::time::sleep(REDIRECT_DELAY * 2).await;
        assert!(app.try_next_event().is_none());
        assert_eq!(app.state.current_view, View::Payment);
    }

    #[tokio::test]
    async fn test_submit_finished_after_teardown_is_ignored() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        app.state.navigate(Route::Activities);
        app.handle_event(AppEvent::SubmitFinished(Ok(())));
        assert!(app.state.payment_form.is_none());
        assert!(app.state.saved_at.is_none());
    }

    #[tokio::test]
    async fn test_escape_quits_from_payment() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_q_quits_from_activities() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        app.handle_event(AppEvent::Navigate(Route::Activities));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_new_payment_from_activities_starts_empty() {
        let mut app = App::with_services(signed_in(), Arc::new(MockPaymentStore::new()), "test");
        type_text(&mut app, "Jane");
        app.handle_event(AppEvent::Navigate(Route::Activities));
        press(&mut app, KeyCode::Char('n'));

        assert_eq!(app.state.current_view, View::Payment);
        assert_eq!(draft_value(&app, PaymentField::Name), "");
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_channel_navigator_forwards_route() {
        let (tx, mut rx) = unbounded_channel();
        ChannelNavigator::new(tx).navigate(Route::Activities);
        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(AppEvent::Navigate(Route::Activities))));
    }
}
