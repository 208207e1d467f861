//! JWT claims and the RS256 token codec.

pub mod claims;
pub mod codec;
pub mod keys;

pub use claims::{Claims, TokenSubject};
pub use codec::TokenCodec;
pub use keys::AuthKeys;
