//! Collaborators the payment form depends on
//!
//! Identity lookup, record insertion and navigation are traits so the form
//! can be driven by fakes in tests.

mod file_store;
mod rest;
mod session;
mod traits;

pub use file_store::JsonFileStore;
pub use rest::RestPaymentStore;
pub use session::SessionAuth;
pub use traits::{AuthProvider, Navigator, PaymentStore};

#[cfg(test)]
pub use traits::{MockAuthProvider, MockNavigator, MockPaymentStore};

#[cfg(test)]
pub mod test_support {
    use super::{Navigator, MockNavigator};
    use crate::state::Route;
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::{Arc, Mutex};

    /// A navigator whose calls can be observed from the test body, even when
    /// made from a spawned task
    pub fn recording_navigator() -> (Arc<dyn Navigator>, Receiver<Route>) {
        let (tx, rx) = channel();
        let tx = Mutex::new(tx);
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().returning(move |route| {
            let _ = tx.lock().map(|tx| tx.send(route));
        });
        (Arc::new(navigator), rx)
    }
}
