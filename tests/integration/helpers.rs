//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use userbase_api::{AppState, build_app};
use userbase_auth::{AuthKeys, AuthSessionManager, PasswordHasher};
use userbase_cache::CacheManager;
use userbase_core::config::{AppConfig, AuthConfig, DatabaseConfig};
use userbase_core::traits::EmailDispatcher;
use userbase_database::DatabasePool;
use userbase_database::UserDirectory;
use userbase_database::migration::run_migrations;
use userbase_database::repositories::{ItemRepository, JobRepository, UserRepository};
use userbase_entity::user::{CreateUser, User};
use userbase_service::{ItemService, UserService};
use userbase_worker::{EmailDistributor, JobQueue};

pub const PASSWORD: &str = "integration-password";

const ACCESS_PRIVATE: &str =
    include_str!("../../crates/userbase-auth/tests/fixtures/access_private.b64");
const ACCESS_PUBLIC: &str =
    include_str!("../../crates/userbase-auth/tests/fixtures/access_public.b64");
const REFRESH_PRIVATE: &str =
    include_str!("../../crates/userbase-auth/tests/fixtures/refresh_private.b64");
const REFRESH_PUBLIC: &str =
    include_str!("../../crates/userbase-auth/tests/fixtures/refresh_public.b64");

/// Test configuration pointing at `DATABASE_URL`.
pub fn test_config() -> AppConfig {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 0,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        cache: Default::default(),
        auth: AuthConfig {
            access_token_private_key: ACCESS_PRIVATE.to_string(),
            access_token_public_key: ACCESS_PUBLIC.to_string(),
            refresh_token_private_key: REFRESH_PRIVATE.to_string(),
            refresh_token_public_key: REFRESH_PUBLIC.to_string(),
            ..AuthConfig::default()
        },
        first_super_user: Default::default(),
        email: Default::default(),
        worker: Default::default(),
        logging: Default::default(),
    }
}

/// Connect and bring the schema up to date.
pub async fn migrated_pool(config: &AppConfig) -> PgPool {
    let pool = DatabasePool::connect(&config.database)
        .await
        .expect("Failed to connect to test database")
        .into_pool();
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

/// Emails are unique per call so tests can share one database.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

/// Unique queue name so job assertions never see another test's rows.
pub fn unique_queue() -> String {
    format!("test-{}", Uuid::new_v4().simple())
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Router wired to PostgreSQL with an in-memory cache.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub users: Arc<UserRepository>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let pool = migrated_pool(&config).await;

        let users = Arc::new(UserRepository::new(pool.clone()));
        let items = Arc::new(ItemRepository::new(pool.clone()));
        let cache = CacheManager::in_memory();
        let keys = Arc::new(AuthKeys::from_config(&config.auth).expect("fixture keys"));
        let dispatcher: Arc<dyn EmailDispatcher> = Arc::new(EmailDistributor::new(
            JobQueue::new(JobRepository::new(pool.clone()), "integration"),
        ));

        let sessions = AuthSessionManager::new(
            users.clone(),
            cache.clone(),
            keys,
            Arc::clone(&dispatcher),
            config.auth.clone(),
            config.email.clone(),
        );
        let user_service = Arc::new(UserService::new(
            users.clone(),
            sessions.clone(),
            dispatcher,
            config.email.clone(),
            config.first_super_user.clone(),
        ));

        let state = AppState {
            config: Arc::new(config),
            db_pool: Some(pool.clone()),
            cache,
            sessions,
            user_service,
            item_service: Arc::new(ItemService::new(items)),
        };

        Self {
            router: build_app(state),
            pool,
            users,
        }
    }

    /// Insert a verified, active account directly.
    pub async fn create_user(&self, email: &str, super_user: bool) -> User {
        let hash = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("hash password");
        self.users
            .create(&CreateUser {
                name: "Integration".to_string(),
                email: email.to_string(),
                password: hash,
                is_active: true,
                is_super_user: super_user,
                verified: true,
            })
            .await
            .expect("create user")
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    /// Log in with the form endpoint and return the token pair.
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let form = format!("username={}&password={password}", email.replace('@', "%40"));
        let request = Request::post("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .expect("build request");

        let response = self.send(request).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        (
            response.body["access_token"].as_str().expect("access").to_string(),
            response.body["refresh_token"].as_str().expect("refresh").to_string(),
        )
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        TestResponse { status, body }
    }
}
