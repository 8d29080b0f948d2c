//! Form domain layer
//!
//! Field values, validation and the submission lifecycle of the payment
//! form. Rendering lives in `ui::forms`.

mod draft;
mod error;
mod field;
mod form_state;
mod redirect;

pub use draft::{PaymentField, PaymentRecord};
pub use field::FormField;
pub use form_state::{Form, FormServices, PaymentForm};

#[cfg(test)]
pub use error::FormError;
#[cfg(test)]
pub use redirect::REDIRECT_DELAY;
