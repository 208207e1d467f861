//! Single-use random tokens (email verification and password reset).

pub mod random;

pub use random::generate_token;
