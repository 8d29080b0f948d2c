//! Errors surfaced on the payment form

use thiserror::Error;

/// Everything that can stop a submission. Each variant renders as the
/// message shown in the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("You must be logged in.")]
    Unauthenticated,
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Invalid card details.")]
    InvalidCardDetails,
    /// The underlying store error is logged, never shown
    #[error("Failed to save payment details.")]
    PersistenceFailure,
}
