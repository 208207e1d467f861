//! RS256 token issuance and parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;

use super::claims::{Claims, TokenSubject};

/// Signs and verifies tokens with one RSA key pair.
///
/// Two instances exist at runtime, one for access tokens and one for refresh
/// tokens. A token signed by one never verifies under the other.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    issuer: String,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from base64-encoded PEM keys.
    pub fn from_base64_pem(
        private_key_b64: &str,
        public_key_b64: &str,
        ttl: TimeDelta,
        issuer: impl Into<String>,
        leeway_seconds: u64,
    ) -> AppResult<Self> {
        let private_pem = decode_base64(private_key_b64, "private")?;
        let public_pem = decode_base64(public_key_b64, "public")?;

        let encoding_key = EncodingKey::from_rsa_pem(&private_pem).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Cannot parse RSA private key from PEM", e)
        })?;
        let decoding_key = DecodingKey::from_rsa_pem(&public_pem).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Cannot parse RSA public key from PEM", e)
        })?;

        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss"]);

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
            issuer,
        })
    }

    /// Issue a token for `user_id`, valid from now for the configured TTL.
    pub fn issue(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("Token lifetime overflows the clock"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Cannot sign token", e))
    }

    /// Verify a token and return its subject.
    ///
    /// Signature, algorithm, `exp`, `nbf` and `iss` are enforced. Any failure
    /// there is `InvalidToken`; a subject that is not a UUID is `InvalidClaims`.
    pub fn parse(&self, token: &str) -> AppResult<TokenSubject> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::invalid_token("Token has expired"),
                JwtErrorKind::ImmatureSignature => AppError::invalid_token("Token is not yet valid"),
                JwtErrorKind::InvalidSignature => AppError::invalid_token("Invalid token signature"),
                JwtErrorKind::InvalidAlgorithm => {
                    AppError::invalid_token("Unexpected token signing algorithm")
                }
                JwtErrorKind::InvalidIssuer | JwtErrorKind::MissingRequiredClaim(_) => {
                    AppError::invalid_claims("Token claims invalid")
                }
                JwtErrorKind::Json(_) => AppError::invalid_claims("Token claims invalid"),
                _ => AppError::invalid_token("Cannot parse token"),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::invalid_claims("Token subject is not a valid user id"))?;

        Ok(TokenSubject {
            user_id,
            email: data.claims.email,
        })
    }
}

fn decode_base64(value: &str, which: &str) -> AppResult<Vec<u8>> {
    let compact: String = value.split_whitespace().collect();
    STANDARD.decode(compact).map_err(|e| {
        AppError::with_source(
            ErrorKind::Internal,
            format!("Cannot decode base64 {which} key"),
            e,
        )
    })
}
