//! Collaborator traits for the payment form, enabling mocking in tests

use crate::state::{PaymentRecord, Route};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Identity lookup for the signed-in user
#[cfg_attr(test, mockall::automock)]
pub trait AuthProvider: Send + Sync {
    /// Identifier of the current user, if anyone is signed in
    fn current_user(&self) -> Option<Uuid>;
}

/// Durable storage for payment records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a single row into the payment table
    async fn insert(&self, record: &PaymentRecord) -> Result<()>;
}

/// Moves the app to another route
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
