//! JWT claims carried by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered claims plus the account email.
///
/// Access and refresh tokens share this layout; only the signing key differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID as a string.
    pub sub: String,
    /// Email of the account at issuance.
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Unique token id, so two tokens issued in the same second differ.
    pub jti: String,
}

/// The identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Owner of the token.
    pub user_id: Uuid,
    /// Email recorded in the token.
    pub email: String,
}
