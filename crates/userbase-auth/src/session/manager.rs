//! Auth session manager: sign-in, refresh rotation, logout, verification
//! and password reset flows.
//!
//! A refresh token is usable only while it is a member of its owner's
//! `RefreshToken:{id}` set. Every write to a user record ends by deleting the
//! cached profile; password changes also delete the whole refresh set.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use userbase_cache::keys;
use userbase_cache::provider::CacheManager;
use userbase_core::config::{AuthConfig, EmailConfig};
use userbase_core::error::AppError;
use userbase_core::result::AppResult;
use userbase_core::traits::{CacheProvider, EmailDispatcher, EnqueueOptions};
use userbase_database::UserDirectory;
use userbase_entity::user::{User, normalize_email};

use crate::email;
use crate::jwt::{AuthKeys, TokenSubject};
use crate::password::PasswordHasher;
use crate::token::generate_token;

/// An access token and the refresh token registered alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

/// Orchestrates the authentication state transitions.
///
/// Holds only shared handles; clones are cheap and share everything.
#[derive(Clone)]
pub struct AuthSessionManager {
    users: Arc<dyn UserDirectory>,
    cache: CacheManager,
    keys: Arc<AuthKeys>,
    hasher: PasswordHasher,
    dispatcher: Arc<dyn EmailDispatcher>,
    auth_config: AuthConfig,
    email_config: EmailConfig,
}

impl std::fmt::Debug for AuthSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSessionManager")
            .field("issuer", &self.auth_config.issuer)
            .finish_non_exhaustive()
    }
}

impl AuthSessionManager {
    /// Creates a new session manager.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        cache: CacheManager,
        keys: Arc<AuthKeys>,
        dispatcher: Arc<dyn EmailDispatcher>,
        auth_config: AuthConfig,
        email_config: EmailConfig,
    ) -> Self {
        Self {
            users,
            cache,
            keys,
            hasher: PasswordHasher::new(),
            dispatcher,
            auth_config,
            email_config,
        }
    }

    /// The codecs used for issuing and verifying tokens.
    pub fn keys(&self) -> &AuthKeys {
        &self.keys
    }

    /// Verify an access token and return its subject.
    pub fn parse_access_token(&self, token: &str) -> AppResult<TokenSubject> {
        self.keys.access.parse(token)
    }

    /// Authenticate with email and password and open a new session.
    ///
    /// There is no cap on concurrent sessions per user.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        // Step 1: Find user
        let user = self.users.find_by_email(&normalize_email(email)).await?;

        // Step 2: Verify password
        if !self.hasher.verify_password(password, &user.password)? {
            return Err(AppError::wrong_password("Wrong password"));
        }

        // Step 3: Issue and register the pair
        let pair = self.issue_pair(&user)?;
        self.cache
            .set_add(&keys::refresh_tokens(user.id), &pair.refresh_token)
            .await?;

        info!(user_id = %user.id, "User signed in");
        Ok(pair)
    }

    /// Rotate a refresh token: the presented token is consumed and a new pair
    /// is issued.
    ///
    /// The old token is removed before anything else happens, so a failure
    /// later on leaves the caller without a usable refresh token rather than
    /// with two.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        // Step 1: Verify signature and expiry
        let subject = self.keys.refresh.parse(refresh_token)?;
        let set_key = keys::refresh_tokens(subject.user_id);

        // Step 2: Claim the token. Only one concurrent rotation wins.
        if !self.cache.set_remove(&set_key, refresh_token).await? {
            return Err(AppError::revoked_token("Refresh token is not registered"));
        }

        // Step 3: Reload the user and issue a new pair
        let user = self.get_user(subject.user_id).await?;
        let pair = self.issue_pair(&user)?;
        self.cache.set_add(&set_key, &pair.refresh_token).await?;

        info!(user_id = %user.id, "Refresh token rotated");
        Ok(pair)
    }

    /// End one session. Removing an unregistered token is not an error.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let subject = self.keys.refresh.parse(refresh_token)?;
        self.cache
            .set_remove(&keys::refresh_tokens(subject.user_id), refresh_token)
            .await?;

        info!(user_id = %subject.user_id, "User logged out");
        Ok(())
    }

    /// End every session of a user.
    pub async fn logout_all(&self, user_id: Uuid) -> AppResult<()> {
        self.cache.delete(&keys::refresh_tokens(user_id)).await?;
        info!(user_id = %user_id, "All sessions revoked");
        Ok(())
    }

    /// End every session of the owner of `refresh_token`.
    pub async fn logout_all_with_token(&self, refresh_token: &str) -> AppResult<()> {
        let subject = self.keys.refresh.parse(refresh_token)?;
        self.logout_all(subject.user_id).await
    }

    /// Confirm an email address with the code sent at registration.
    pub async fn verify(&self, code: &str) -> AppResult<()> {
        let user = self.users.find_by_verification_code(code).await?;

        if user.verified {
            return Err(AppError::already_verified("User already verified"));
        }

        let user = self.users.update_verification(user.id, "", true).await?;
        self.invalidate_user(user.id).await?;

        info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    /// Start a password reset: store a fresh token and email it.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        // Step 1: Only verified accounts may reset
        let user = self.users.find_by_email(&normalize_email(email)).await?;
        if !user.verified {
            return Err(AppError::not_verified("User not verified"));
        }

        // Step 2: Store token and expiry
        let token = generate_token();
        let expires_at = Utc::now() + self.keys.reset_token_ttl();
        let user = self
            .users
            .update_password_reset(user.id, &token, expires_at)
            .await?;
        self.invalidate_user(user.id).await?;

        // Step 3: Hand the email to the queue
        let message = email::password_reset_email(
            &self.email_config,
            &user.email,
            &user.name,
            &token,
            self.keys.reset_token_ttl().num_minutes(),
        );
        self.dispatcher
            .enqueue(message, EnqueueOptions::account_email())
            .await?;

        info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    /// Finish a password reset with the emailed token.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        if new_password != confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        let user = self.users.find_by_reset_token(token, Utc::now()).await?;
        let hash = self.hasher.hash_password(new_password)?;
        let user = self.users.reset_password(user.id, &hash).await?;

        self.invalidate_user(user.id).await?;
        self.cache.delete(&keys::refresh_tokens(user.id)).await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }

    /// Change a password after checking the current one. Ends every session.
    pub async fn update_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<User> {
        if new_password != confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        let user = self.get_user(user_id).await?;
        if !self.hasher.verify_password(old_password, &user.password)? {
            return Err(AppError::wrong_password("Old password is incorrect"));
        }

        let hash = self.hasher.hash_password(new_password)?;
        let user = self.users.update_password(user.id, &hash).await?;

        self.invalidate_user(user.id).await?;
        self.cache.delete(&keys::refresh_tokens(user.id)).await?;

        info!(user_id = %user.id, "Password updated");
        Ok(user)
    }

    /// Read a user through the profile cache.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let key = keys::user_profile(user_id);
        if let Some(user) = self.cache.get_json::<User>(&key).await? {
            return Ok(user);
        }

        debug!(user_id = %user_id, "User cache miss");
        let user = self.users.find_by_id(user_id).await?;
        self.cache
            .set_json(
                &key,
                &user,
                Duration::from_secs(self.auth_config.user_cache_ttl_seconds),
            )
            .await?;
        Ok(user)
    }

    /// Drop the cached profile of a user.
    pub async fn invalidate_user(&self, user_id: Uuid) -> AppResult<()> {
        self.cache.delete(&keys::user_profile(user_id)).await
    }

    fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.keys.access.issue(user.id, &user.email)?,
            refresh_token: self.keys.refresh.issue(user.id, &user.email)?,
        })
    }
}
