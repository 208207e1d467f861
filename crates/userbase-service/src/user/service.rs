//! Account creation, profile updates and administration.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use userbase_auth::email;
use userbase_auth::token::generate_token;
use userbase_auth::{AuthSessionManager, PasswordHasher};
use userbase_core::config::{EmailConfig, FirstSuperUserConfig};
use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_core::traits::{EmailDispatcher, EnqueueOptions};
use userbase_database::UserDirectory;
use userbase_entity::user::{CreateUser, UpdateUser, User, normalize_email};

use crate::pagination::Page;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_active: bool,
    pub is_super_user: bool,
    pub verified: bool,
}

/// Handles account lifecycle outside of authentication.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserDirectory>,
    sessions: AuthSessionManager,
    dispatcher: Arc<dyn EmailDispatcher>,
    hasher: PasswordHasher,
    email_config: EmailConfig,
    first_super_user: FirstSuperUserConfig,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: AuthSessionManager,
        dispatcher: Arc<dyn EmailDispatcher>,
        email_config: EmailConfig,
        first_super_user: FirstSuperUserConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            dispatcher,
            hasher: PasswordHasher::new(),
            email_config,
            first_super_user,
        }
    }

    /// Create an account. Unverified accounts are sent a verification email.
    pub async fn create(&self, input: NewUser) -> AppResult<User> {
        if input.password != input.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        let password = self.hasher.hash_password(input.password.trim())?;
        let user = self
            .users
            .create(&CreateUser {
                name: input.name,
                email: normalize_email(&input.email),
                password,
                is_active: input.is_active,
                is_super_user: input.is_super_user,
                verified: input.verified,
            })
            .await?;

        info!(user_id = %user.id, "User created");

        if user.verified {
            return Ok(user);
        }

        let code = generate_token();
        let user = self.users.update_verification_code(user.id, &code).await?;

        let message = email::verification_email(&self.email_config, &user.email, &user.name, &code);
        self.dispatcher
            .enqueue(message, EnqueueOptions::account_email())
            .await?;

        debug!(user_id = %user.id, "Verification email queued");
        Ok(user)
    }

    /// Read a user through the profile cache.
    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        self.sessions.get_user(id).await
    }

    /// Page through all users.
    pub async fn list(&self, page: Page) -> AppResult<Vec<User>> {
        let (offset, limit) = page.normalize();
        self.users.list(offset, limit).await
    }

    /// Change profile fields of an existing user.
    pub async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<User> {
        let current = self.sessions.get_user(id).await?;
        let user = self.users.update_profile(current.id, &changes).await?;
        self.sessions.invalidate_user(user.id).await?;

        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Delete a user together with its cached profile and sessions.
    pub async fn delete(&self, id: Uuid) -> AppResult<User> {
        let user = self.users.delete(id).await?;
        self.sessions.invalidate_user(user.id).await?;
        self.sessions.logout_all(user.id).await?;

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }

    /// Create the configured first super user unless that email is taken.
    ///
    /// Returns `true` if an account was created.
    pub async fn create_super_user_if_not_exist(&self) -> AppResult<bool> {
        let email = normalize_email(&self.first_super_user.email);
        match self.users.find_by_email(&email).await {
            Ok(_) => return Ok(false),
            Err(e) if e.is(ErrorKind::NotFound) => {}
            Err(e) => return Err(e),
        }

        let config = &self.first_super_user;
        self.create(NewUser {
            name: config.name.clone(),
            email,
            password: config.password.clone(),
            confirm_password: config.password.clone(),
            is_active: true,
            is_super_user: true,
            verified: true,
        })
        .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use userbase_auth::AuthKeys;
    use userbase_cache::CacheManager;
    use userbase_cache::keys;
    use userbase_core::config::AuthConfig;
    use userbase_core::traits::{CacheProvider, EmailMessage};
    use userbase_database::directory::InMemoryUserDirectory;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl EmailDispatcher for RecordingDispatcher {
        async fn enqueue(&self, email: EmailMessage, _options: EnqueueOptions) -> AppResult<()> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            access_token_private_key: include_str!("../../../userbase-auth/tests/fixtures/access_private.b64").to_string(),
            access_token_public_key: include_str!("../../../userbase-auth/tests/fixtures/access_public.b64").to_string(),
            refresh_token_private_key: include_str!("../../../userbase-auth/tests/fixtures/refresh_private.b64").to_string(),
            refresh_token_public_key: include_str!("../../../userbase-auth/tests/fixtures/refresh_public.b64").to_string(),
            ..AuthConfig::default()
        }
    }

    fn service() -> (UserService, Arc<InMemoryUserDirectory>, Arc<RecordingDispatcher>) {
        let (service, users, mail, _) = service_with_cache();
        (service, users, mail)
    }

    fn service_with_cache() -> (
        UserService,
        Arc<InMemoryUserDirectory>,
        Arc<RecordingDispatcher>,
        CacheManager,
    ) {
        let users = Arc::new(InMemoryUserDirectory::new());
        let mail = Arc::new(RecordingDispatcher::default());
        let cache = CacheManager::in_memory();
        let sessions = AuthSessionManager::new(
            users.clone(),
            cache.clone(),
            Arc::new(AuthKeys::from_config(&auth_config()).unwrap()),
            mail.clone(),
            auth_config(),
            EmailConfig::default(),
        );
        let service = UserService::new(
            users.clone(),
            sessions,
            mail.clone(),
            EmailConfig::default(),
            FirstSuperUserConfig::default(),
        );
        (service, users, mail, cache)
    }

    fn new_user(email: &str, verified: bool) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password: "password-123".to_string(),
            confirm_password: "password-123".to_string(),
            is_active: true,
            is_super_user: false,
            verified,
        }
    }

    #[tokio::test]
    async fn test_create_unverified_sends_verification_email() {
        let (service, users, mail) = service();

        let user = service
            .create(new_user(" Ann@Example.COM", false))
            .await
            .unwrap();

        assert_eq!(user.email, "ann@example.com");
        let code = users.get(user.id).unwrap().verification_code.unwrap();
        let sent = mail.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body_plain.contains(&format!("verifyemail?code={code}")));
    }

    #[tokio::test]
    async fn test_create_verified_sends_nothing() {
        let (service, users, mail) = service();
        let user = service.create(new_user("ann@example.com", true)).await.unwrap();

        assert!(users.get(user.id).unwrap().verification_code.is_none());
        assert!(mail.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_mismatch_and_duplicates() {
        let (service, _, _) = service();

        let mut mismatched = new_user("ann@example.com", true);
        mismatched.confirm_password = "different".to_string();
        let err = service.create(mismatched).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        service.create(new_user("ann@example.com", true)).await.unwrap();
        let err = service
            .create(new_user("ANN@example.com", true))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let (service, _, _) = service();
        let user = service.create(new_user("ann@example.com", true)).await.unwrap();
        service.get(user.id).await.unwrap();

        let changes = UpdateUser {
            name: Some("Annie".to_string()),
        };
        service.update(user.id, changes).await.unwrap();

        assert_eq!(service.get(user.id).await.unwrap().name, "Annie");
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let (service, _, _) = service();
        let user = service.create(new_user("ann@example.com", true)).await.unwrap();
        service.get(user.id).await.unwrap();

        service.delete(user.id).await.unwrap();

        let err = service.get(user.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = service.delete(user.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_ends_every_session() {
        let (service, users, _, cache) = service_with_cache();
        let user = service.create(new_user("ann@example.com", true)).await.unwrap();
        cache
            .set_add(&keys::refresh_tokens(user.id), "laptop-token")
            .await
            .unwrap();
        cache
            .set_add(&keys::refresh_tokens(user.id), "phone-token")
            .await
            .unwrap();
        service.get(user.id).await.unwrap();

        service.delete(user.id).await.unwrap();

        for token in ["laptop-token", "phone-token"] {
            assert!(
                !cache
                    .set_is_member(&keys::refresh_tokens(user.id), token)
                    .await
                    .unwrap()
            );
        }
        assert_eq!(cache.get(&keys::user_profile(user.id)).await.unwrap(), None);
        assert!(users.get(user.id).is_none());
    }

    #[tokio::test]
    async fn test_super_user_bootstrap_runs_once() {
        let (service, users, _) = service();

        assert!(service.create_super_user_if_not_exist().await.unwrap());
        assert!(!service.create_super_user_if_not_exist().await.unwrap());

        let admin = users
            .find_by_email(&FirstSuperUserConfig::default().email)
            .await
            .unwrap();
        assert!(admin.is_super_user && admin.is_active && admin.verified);
    }
}
