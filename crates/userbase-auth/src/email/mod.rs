//! Account email composition.

pub mod templates;

pub use templates::{password_reset_email, verification_email};
