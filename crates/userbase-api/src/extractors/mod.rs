//! Custom Axum extractors.

pub mod auth;
pub mod validated;

pub use auth::{BearerToken, CurrentUser, SuperUser};
pub use validated::{ValidatedForm, ValidatedJson};
