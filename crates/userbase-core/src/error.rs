//! Unified application error types for userbase.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] is the only part
//! the HTTP layer inspects when choosing a status code, so every failure path
//! must pick a stable kind.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown email, id, verification code or reset token.
    NotFound,
    /// Input validation failed (including password confirmation mismatch).
    Validation,
    /// The request could not be decoded.
    BadRequest,
    /// Credential mismatch.
    WrongPassword,
    /// Malformed, mis-signed, wrong-algorithm or expired token.
    InvalidToken,
    /// The token verified but its claims could not be interpreted.
    InvalidClaims,
    /// No bearer token was supplied.
    TokenNotFound,
    /// A cryptographically valid refresh token that is no longer registered.
    RevokedToken,
    /// The account has already been verified.
    AlreadyVerified,
    /// The account has not been verified yet.
    NotVerified,
    /// The account is disabled.
    InactiveUser,
    /// The caller lacks the privileges for the action.
    Forbidden,
    /// A unique constraint was violated (duplicate email).
    Conflict,
    /// The request exceeded its deadline.
    Timeout,
    /// An internal server error occurred (hashing, signing, key material).
    Internal,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::WrongPassword => write!(f, "WRONG_PASSWORD"),
            Self::InvalidToken => write!(f, "INVALID_TOKEN"),
            Self::InvalidClaims => write!(f, "INVALID_CLAIMS"),
            Self::TokenNotFound => write!(f, "TOKEN_NOT_FOUND"),
            Self::RevokedToken => write!(f, "REVOKED_TOKEN"),
            Self::AlreadyVerified => write!(f, "ALREADY_VERIFIED"),
            Self::NotVerified => write!(f, "NOT_VERIFIED"),
            Self::InactiveUser => write!(f, "INACTIVE_USER"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout userbase.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn wrong_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongPassword, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidClaims, message)
    }

    pub fn token_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenNotFound, message)
    }

    pub fn revoked_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RevokedToken, message)
    }

    pub fn already_verified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyVerified, message)
    }

    pub fn not_verified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotVerified, message)
    }

    pub fn inactive_user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InactiveUser, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::revoked_token("refresh token is not registered");
        assert_eq!(
            err.to_string(),
            "REVOKED_TOKEN: refresh token is not registered"
        );
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk gone");
        let err = AppError::from(io);
        assert!(std::error::Error::source(&err).is_some());

        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Internal);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_is_matches_kind() {
        let err = AppError::not_found("user");
        assert!(err.is(ErrorKind::NotFound));
        assert!(!err.is(ErrorKind::Validation));
    }
}
