//! # userbase-auth
//!
//! Authentication and session lifecycle for userbase.
//!
//! ## Modules
//!
//! - `jwt`: RS256 token issuance and parsing, one codec per key pair
//! - `password`: Argon2id password hashing
//! - `token`: random verification and reset tokens
//! - `email`: account email composition
//! - `session`: sign-in, refresh rotation, logout, verification and
//!   password reset flows over the refresh-token registry

pub mod email;
pub mod jwt;
pub mod password;
pub mod session;
pub mod token;

pub use jwt::{AuthKeys, Claims, TokenCodec, TokenSubject};
pub use password::PasswordHasher;
pub use session::{AuthSessionManager, TokenPair};
