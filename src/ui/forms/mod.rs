//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `payment_form`: Card entry form

mod field_renderer;
mod payment_form;

pub use payment_form::draw_payment_form;
